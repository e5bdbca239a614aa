//! Minimal framework config: token, optional API URL and log file path.
//! Loaded from env: BOT_TOKEN (or TG_BOT_API_KEY), TELEGRAM_API_URL (or TELOXIDE_API_URL), LOG_FILE.

use anyhow::Result;
use std::env;

pub const DEFAULT_LOG_FILE: &str = "logs/winko-bot.log";

/// Minimal Telegram bot config (connectivity and logging only).
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: String,
}

impl TelegramConfig {
    /// Loads from env. `token` overrides BOT_TOKEN when given; one of them is required.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN")
                .or_else(|_| env::var("TG_BOT_API_KEY"))
                .map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    /// Builds config with the given token; no API override, default log file.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }

    /// Rejects a telegram_api_url that is set but not a valid URL.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "BOT_TOKEN",
            "TG_BOT_API_KEY",
            "TELEGRAM_API_URL",
            "TELOXIDE_API_URL",
            "LOG_FILE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_with_token() {
        let config = TelegramConfig::with_token("test_token".to_string());
        assert_eq!(config.bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token() {
        clear_env();
        let err = TelegramConfig::from_env(None).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_from_env_accepts_legacy_token_name() {
        clear_env();
        env::set_var("TG_BOT_API_KEY", "legacy");
        let config = TelegramConfig::from_env(None).unwrap();
        assert_eq!(config.bot_token, "legacy");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_override_wins_over_env() {
        clear_env();
        env::set_var("BOT_TOKEN", "env_token");
        env::set_var("LOG_FILE", "/tmp/winko.log");
        let config = TelegramConfig::from_env(Some("cli_token".to_string())).unwrap();
        assert_eq!(config.bot_token, "cli_token");
        assert_eq!(config.log_file, "/tmp/winko.log");
        clear_env();
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = TelegramConfig::with_token("t".to_string());
        config.telegram_api_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
        config.telegram_api_url = Some("http://127.0.0.1:8081".to_string());
        assert!(config.validate().is_ok());
    }
}
