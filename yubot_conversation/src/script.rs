//! Fixed dialogue lines sent outside the reply engine.

/// Scripted utterances for the dialogue lifecycle.
///
/// The greeting seeds every session's history, the opener answers the first
/// user turn before any model context exists, and the closing lines are sent
/// once a dialogue is finalized.
#[derive(Debug, Clone)]
pub struct DialogueScript {
    /// Initial system utterance, also the history seed.
    pub greeting: String,
    /// Reply to the very first user turn.
    pub opener: String,
    /// Prefix of the terminal marker message carrying the export id.
    pub finish_prefix: String,
    /// Human-readable instruction sent after the marker.
    pub closing: String,
}

impl Default for DialogueScript {
    fn default() -> Self {
        Self {
            greeting: "湯川先輩，お疲れ様です!!😄".to_string(),
            opener: "次の週末にオンライン飲み会をやろうと思うんですが、先輩もどうですか！？"
                .to_string(),
            finish_prefix: "_FINISHED_:".to_string(),
            closing:
                "対話終了です．エクスポートした「messages.html」ファイルを，フォームからアップロードしてください．"
                    .to_string(),
        }
    }
}

impl DialogueScript {
    /// Render the terminal marker message for an export id.
    #[must_use]
    pub fn finish_marker(&self, export_id: &str) -> String {
        format!("{}{export_id}", self.finish_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_marker_prefixes_export_id() {
        let script = DialogueScript::default();
        assert_eq!(
            script.finish_marker("1700000000:42:yubot"),
            "_FINISHED_:1700000000:42:yubot"
        );
    }
}
