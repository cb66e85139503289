//! Context window construction for reply generation.

/// Literal separator between history entries in a joined context.
pub const CONTEXT_SEPARATOR: &str = " [SEP] ";

/// Number of trailing history entries sent to the reply engine.
pub const CONTEXT_WINDOW: usize = 2;

/// Join the last [`CONTEXT_WINDOW`] entries of `history` with
/// [`CONTEXT_SEPARATOR`]. Shorter histories are used in full.
#[must_use]
pub fn context_window(history: &[String]) -> String {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    history[start..].join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterances(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn joins_last_two_entries() {
        let history = utterances(&["a", "b", "c"]);
        assert_eq!(context_window(&history), "b [SEP] c");
    }

    #[test]
    fn single_entry_is_returned_as_is() {
        let history = utterances(&["こんにちは"]);
        assert_eq!(context_window(&history), "こんにちは");
    }

    #[test]
    fn empty_history_yields_empty_context() {
        assert_eq!(context_window(&[]), "");
    }

    #[test]
    fn japanese_pair_round_trips() {
        let history = utterances(&["こんにちは", "元気です"]);
        assert_eq!(context_window(&history), "こんにちは [SEP] 元気です");
    }
}
