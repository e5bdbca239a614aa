use std::time::Duration;

use anyhow::Result;

use super::{optional_env, parse_env};
use crate::run_resolver::{PollPolicy, DEFAULT_MAX_RETRIES, DEFAULT_POLL_INTERVAL};

/// Assistant API access and run polling. OPENAI_API_KEY is required.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub api_key: String,
    /// OPENAI_BASE_URL; `None` uses the client default.
    pub base_url: Option<String>,
    /// ASSISTANT_ID; without it the assistant lookup fails on every message.
    pub assistant_id: Option<String>,
    pub poll: PollPolicy,
}

impl AssistantSettings {
    pub fn from_env() -> Result<Self> {
        let api_key =
            optional_env("OPENAI_API_KEY").ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not set"))?;
        let interval_secs = parse_env("RUN_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL.as_secs())?;
        let max_retries = parse_env("RUN_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        Ok(Self {
            api_key,
            base_url: optional_env("OPENAI_BASE_URL"),
            assistant_id: optional_env("ASSISTANT_ID"),
            poll: PollPolicy {
                max_retries,
                interval: Duration::from_secs(interval_secs),
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll.max_retries == 0 {
            anyhow::bail!("RUN_MAX_RETRIES must be at least 1");
        }
        if let Some(ref url) = self.base_url {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("OPENAI_BASE_URL is set but not a valid URL: {}", url);
            }
        }
        Ok(())
    }
}
