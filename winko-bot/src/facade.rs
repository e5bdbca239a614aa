//! Entry points behind the CLI subcommands.

use std::sync::Arc;

use anyhow::{Context, Result};
use bsc_client::BalanceClient;
use dbot_core::init_tracing;
use dbot_telegram::{build_teloxide_bot, run_repl, TelegramBotAdapter};
use tracing::{info, instrument};

use crate::assembly::{build_balance_client, build_gateway, build_handler, build_handler_chain, build_services};
use crate::config::{AssistantSettings, BotConfig, BscSettings};
use crate::crypto::function_tools;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
pub const DEFAULT_ASSISTANT_NAME: &str = "Winko";
pub const ASSISTANT_INSTRUCTIONS: &str = "you are assistant which helps user with crypto related questions";

/// Validates config, initializes logging, assembles the chain and runs the Telegram REPL.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.telegram.log_file)?;

    info!(
        assistant_id = ?config.assistant.assistant_id,
        max_retries = config.assistant.poll.max_retries,
        poll_interval_secs = config.assistant.poll.interval.as_secs(),
        bsc_api_url = %config.bsc.base_url,
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&config.telegram)?;
    let bot_adapter: Arc<dyn dbot_core::Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let services = build_services(&config)?;
    let handler_chain = build_handler_chain(build_handler(&config, services, bot_adapter));

    info!("Bot started successfully");
    run_repl(teloxide_bot, handler_chain).await
}

/// One balance lookup for `address`. Returns the BNB amount.
#[instrument]
pub async fn check_balance(address: &str) -> Result<String> {
    let client = build_balance_client(&BscSettings::from_env()?)?;
    client
        .get_bnb_allocation(address)
        .await
        .with_context(|| format!("failed to get bnb allocation of {}", address))
}

/// Registers an assistant exposing the crypto functions. Returns the new assistant id.
#[instrument]
pub async fn create_assistant(model: &str, name: &str) -> Result<String> {
    let gateway = build_gateway(&AssistantSettings::from_env()?);
    gateway
        .create_assistant(model, name, ASSISTANT_INSTRUCTIONS, &function_tools())
        .await
        .context("failed to create assistant")
}
