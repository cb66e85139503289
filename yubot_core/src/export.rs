//! Export identifier for finished dialogues.
//!
//! Downstream export tooling correlates a finished session with its
//! uploaded transcript via this key, so the format is fixed.

/// Inputs for the export identifier of a finalized session.
#[derive(Debug, Clone)]
pub struct ExportStamp {
    /// Unix timestamp of the finalizing message.
    pub unix_time: i64,
    /// Persistent user identifier on the originating transport.
    pub user_id: String,
    /// Identity of the bot that held the dialogue.
    pub bot_name: String,
}

impl ExportStamp {
    #[must_use]
    pub fn new(unix_time: i64, user_id: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self {
            unix_time,
            user_id: user_id.into(),
            bot_name: bot_name.into(),
        }
    }

    /// Render the identifier as `{unix_timestamp}:{user_id}:{bot_identity}`.
    #[must_use]
    pub fn export_id(&self) -> String {
        format!("{}:{}:{}", self.unix_time, self.user_id, self.bot_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_id_is_bit_exact() {
        let stamp = ExportStamp::new(1_700_000_000, "42", "yubot");
        assert_eq!(stamp.export_id(), "1700000000:42:yubot");
    }

    #[test]
    fn user_id_passes_through_unchanged() {
        let stamp = ExportStamp::new(0, "user-αβ", "bot");
        assert_eq!(stamp.export_id(), "0:user-αβ:bot");
    }
}
