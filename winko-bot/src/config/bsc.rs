use std::time::Duration;

use anyhow::{Context, Result};
use bsc_client::{BscConfig, DEFAULT_BSC_API_URL, DEFAULT_TIMEOUT_SECS};

use super::optional_env;

/// BSC explorer settings. BSC_API_KEY is required; BSC_API_TIMEOUT is in seconds.
#[derive(Debug, Clone)]
pub struct BscSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl BscSettings {
    pub fn from_env() -> Result<Self> {
        let api_key =
            optional_env("BSC_API_KEY").ok_or_else(|| anyhow::anyhow!("BSC_API_KEY is not set"))?;
        let base_url =
            optional_env("BSC_API_URL").unwrap_or_else(|| DEFAULT_BSC_API_URL.to_string());
        let timeout_secs = match optional_env("BSC_API_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("failed to parse timeout: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client_config(&self) -> BscConfig {
        BscConfig::new(self.base_url.clone(), self.api_key.clone()).with_timeout(self.timeout)
    }
}
