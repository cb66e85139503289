use crate::command::CommandStrategy;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use yubot_config::Config;
use yubot_conversation::{DialogueManager, DialogueScript};
use yubot_core::ReplyEngine;
use yubot_providers::RetrievalProvider;
use yubot_telegram::YuBot;

/// Input for the Telegram transport command.
pub struct TelegramInput {
    /// Optional bot token (overrides config)
    pub token: Option<String>,
}

/// Strategy for running the Telegram polling transport.
pub struct TelegramStrategy;

impl CommandStrategy for TelegramStrategy {
    type Input = TelegramInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let token = match input.token {
            Some(t) if !t.trim().is_empty() => t,
            _ => config.telegram.token.clone(),
        };

        let engine: Arc<dyn ReplyEngine> = Arc::new(RetrievalProvider::new(
            config.engine.base_url.clone(),
            Duration::from_secs(config.engine.timeout_secs),
        )?);

        let manager = Arc::new(DialogueManager::new(
            engine,
            DialogueScript::default(),
            config.dialogue.length,
            Duration::from_secs(config.engine.timeout_secs),
        ));

        info!(
            "Starting Telegram bot (dialogue length: {})...",
            config.dialogue.length
        );

        let bot = YuBot::new(token, manager);

        info!("Telegram bot is running. Press Ctrl+C to stop.");
        bot.run().await?;

        Ok(())
    }
}
