use crate::{Command, Result, YuBot};
use teloxide::{requests::Requester, types::Message};
use tracing::{debug, info, warn};
use yubot_conversation::TurnError;
use yubot_core::ExportStamp;

/// Handle bot commands
pub async fn handle_command(relay: YuBot, msg: Message, cmd: Command, user_id: &str) -> Result<()> {
    match cmd {
        Command::Start => {
            info!("[{user_id}] Command: /start");
            match relay.manager.start_session(user_id).await {
                Ok(greeting) => {
                    relay.bot.send_message(msg.chat.id, greeting).await?;
                }
                Err(e) => {
                    warn!("[{user_id}] Start failed: {e}");
                }
            }
        }
    }

    Ok(())
}

/// Handle any message (commands or regular text)
pub async fn handle_message(relay: YuBot, msg: Message) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    // The persistent user identifier keys the session.
    let user_id = msg
        .from
        .as_ref()
        .map_or_else(|| msg.chat.id.0.to_string(), |user| user.id.0.to_string());

    // Processing and delivery for one user stay in turn order.
    let lock = relay.delivery_lock(&user_id).await;
    let _ordered = lock.lock().await;

    if let Some(cmd) = Command::parse_from_text(text) {
        return handle_command(relay, msg, cmd, &user_id).await;
    }

    info!("[{user_id}] Message: {text}");

    relay
        .bot
        .send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    let stamp = ExportStamp::new(msg.date.timestamp(), user_id.clone(), relay.bot_name.clone());
    let script = relay.manager.script().clone();

    match relay.manager.process_turn(&user_id, text, &stamp).await {
        Ok(outcome) => {
            info!("[{user_id}] Reply: {}", outcome.reply);
            relay.bot.send_message(msg.chat.id, outcome.reply).await?;

            if let Some(export_id) = outcome.export_id {
                relay
                    .bot
                    .send_message(msg.chat.id, script.finish_marker(&export_id))
                    .await?;
                relay.bot.send_message(msg.chat.id, script.closing).await?;
            }
        }
        Err(TurnError::SessionClosed(_)) => {
            // Finalized sessions get the closing notice again, nothing else.
            relay.bot.send_message(msg.chat.id, script.closing).await?;
        }
        Err(e @ TurnError::EngineUnavailable(_)) => {
            warn!("[{user_id}] Skipping reply: {e}");
        }
        Err(e) => {
            warn!("[{user_id}] Turn failed: {e}");
        }
    }

    Ok(())
}
