use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};
use yubot_conversation::DialogueManager;

/// Telegram polling transport for the dialogue relay.
pub struct YuBot {
    /// Teloxide bot instance
    pub bot: Bot,
    /// Shared turn processing
    pub(crate) manager: Arc<DialogueManager>,
    /// Per-user delivery locks: replies to one user go out in the order
    /// their turns were processed, even though updates dispatch concurrently
    delivery: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    /// Bot identity used in export identifiers, resolved at startup
    pub(crate) bot_name: String,
}

impl YuBot {
    #[must_use]
    pub fn new(token: String, manager: Arc<DialogueManager>) -> Self {
        Self {
            bot: Bot::new(token),
            manager,
            delivery: Arc::new(Mutex::new(HashMap::new())),
            bot_name: String::new(),
        }
    }

    /// Delivery lock for a user, created on first contact.
    pub(crate) async fn delivery_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.delivery.lock().await;
        locks
            .entry(user_id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Test connection to the Telegram API with exponential backoff retry.
    /// Starts at 2s, increases by 2s each attempt, max 10s delay.
    /// Retries indefinitely until connection succeeds.
    ///
    /// Returns the bot username, the identity stamped into export ids.
    async fn test_connection(&self) -> Result<String> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(me) => {
                    let username = me
                        .user
                        .username
                        .clone()
                        .unwrap_or_else(|| "yubot".to_string());
                    info!(
                        "Connected to Telegram API: @{username} (id: {})",
                        me.user.id
                    );
                    return Ok(username);
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);
                    let delay = Duration::from_secs(delay_secs);

                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");

                    // Only show detailed help on first failure
                    if attempt == 1 {
                        warn!("This may be due to:");
                        warn!("  - Network connectivity issues");
                        warn!("  - Firewall blocking api.telegram.org");
                        warn!("  - Invalid bot token");
                        warn!("  - Telegram API being temporarily unavailable");
                    }

                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run the bot
    pub async fn run(mut self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        self.bot_name = self.test_connection().await?;

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let relay = self.clone();
            move |_bot: Bot, msg: teloxide::types::Message| {
                let relay = relay.clone();
                async move { crate::handler::handle_message(relay, msg).await }
            }
        }));

        Dispatcher::builder(bot, schema)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

impl Clone for YuBot {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            manager: Arc::clone(&self.manager),
            delivery: Arc::clone(&self.delivery),
            bot_name: self.bot_name.clone(),
        }
    }
}
