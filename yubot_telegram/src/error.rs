use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("turn processing error: {0}")]
    Turn(#[from] yubot_conversation::TurnError),

    #[error("Configuration error: {0}")]
    Config(String),
}
