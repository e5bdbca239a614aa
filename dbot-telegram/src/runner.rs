//! REPL runner: converts teloxide text messages to core::Message and passes each to the HandlerChain in its own task.

use anyhow::{Context, Result};
use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use crate::adapters::TelegramMessageWrapper;
use crate::config::TelegramConfig;

/// Builds the teloxide bot from config, applying the API URL override when set.
pub fn build_teloxide_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    match config.telegram_api_url {
        Some(ref url_str) => {
            let url = reqwest::Url::parse(url_str)
                .with_context(|| format!("invalid TELEGRAM_API_URL: {}", url_str))?;
            info!(api_url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Starts the REPL. Non-text updates are skipped. Handler errors are logged and the message dropped;
/// they never stop the REPL.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            "Bot identity resolved, starting repl"
        ),
        Err(e) => error!(error = %e, "getMe failed; starting repl anyway"),
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();

        async move {
            if msg.text().is_none() {
                info!(chat_id = msg.chat.id.0, "Received non-text message, skipped");
                return Ok(());
            }

            let core_msg = TelegramMessageWrapper(&msg).to_core();
            info!(
                user_id = core_msg.sender_id(),
                chat_id = core_msg.chat.id,
                message_content = %core_msg.content,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(
                        error = %e,
                        user_id = core_msg.sender_id(),
                        "an error occurred while handling update"
                    );
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
