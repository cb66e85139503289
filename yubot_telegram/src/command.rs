use teloxide::types::BotCommand;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
}

impl Command {
    #[must_use]
    pub fn bot_commands() -> Vec<BotCommand> {
        vec![BotCommand {
            command: "start".to_string(),
            description: "対話を最初から始めます".to_string(),
        }]
    }

    #[must_use]
    pub fn parse_from_text(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();

        // Remove bot mention if present (e.g., "/start@my_bot")
        let text = text.split('@').next().unwrap_or(&text).to_string();

        match text.as_str() {
            "/start" => Some(Self::Start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_command() {
        assert_eq!(Command::parse_from_text("/start"), Some(Command::Start));
        assert_eq!(Command::parse_from_text(" /START "), Some(Command::Start));
        assert_eq!(
            Command::parse_from_text("/start@yubot"),
            Some(Command::Start)
        );
    }

    #[test]
    fn ordinary_text_is_not_a_command() {
        assert_eq!(Command::parse_from_text("こんにちは"), None);
        assert_eq!(Command::parse_from_text("/stop"), None);
    }
}
