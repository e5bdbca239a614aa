//! Bot configuration: Telegram connectivity + assistant API + BSC explorer + optional seed user.
//! All values come from the environment (after `.env` is loaded); use [`BotConfig::load`] then
//! [`BotConfig::validate`].

mod assistant;
mod bsc;


use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dbot_telegram::TelegramConfig;

use crate::store::UserRecord;

pub use assistant::AssistantSettings;
pub use bsc::BscSettings;

pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub assistant: AssistantSettings,
    pub bsc: BscSettings,
    /// The single user known to the in-memory store, from `SEED_*`.
    pub seed_user: Option<UserRecord>,
}

impl BotConfig {
    /// Loads everything from env. `token` overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            telegram: TelegramConfig::from_env(token)?,
            assistant: AssistantSettings::from_env()?,
            bsc: BscSettings::from_env()?,
            seed_user: seed_user_from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        self.assistant.validate()
    }
}

/// Reads an optional env var and parses it; unset or blank yields `default`.
pub(crate) fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {}: {}", key, raw)),
        _ => Ok(default),
    }
}

/// Trimmed value of an env var; unset or blank yields `None`.
pub(crate) fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn seed_user_from_env() -> Result<Option<UserRecord>> {
    let Some(raw_id) = optional_env("SEED_TG_USER_ID") else {
        return Ok(None);
    };
    let tg_user_id: i64 = raw_id
        .trim()
        .parse()
        .with_context(|| format!("invalid SEED_TG_USER_ID: {}", raw_id))?;
    Ok(Some(UserRecord {
        id: 1,
        tg_user_id,
        last_thread_id: optional_env("SEED_THREAD_ID"),
        wallet_address: optional_env("SEED_WALLET_ADDRESS"),
    }))
}
