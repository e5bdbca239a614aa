//! # BSC balance client
//!
//! Looks up the native BNB balance of an address through a BscScan-compatible explorer API
//! (`GET <base>?module=account&action=balance&address=<addr>&apikey=<key>`) and rescales the
//! wei amount into a human-readable decimal string.
//!
//! ```rust,no_run
//! use bsc_client::{BalanceClient, BscClient, BscConfig};
//!
//! async fn example() -> Result<(), bsc_client::BscError> {
//!     let client = BscClient::new(BscConfig::new("https://api.bscscan.com/api", "key"))?;
//!     let bnb = client.get_bnb_allocation("0xAf0476C27A15b2A6C7b9BDFe410fe0E59Ef7bEAA").await?;
//!     println!("{bnb} BNB");
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// BNB amounts are integers in 18-decimal subunits.
pub const BNB_DECIMALS: usize = 18;

pub const DEFAULT_BSC_API_URL: &str = "https://api.bscscan.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum BscError {
    #[error("balance request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid balance response: {0}")]
    InvalidResponse(String),
}

/// Balance lookup seam; the assistant's capability layer only depends on this.
#[async_trait]
pub trait BalanceClient: Send + Sync {
    /// Returns the BNB balance of `address` as a decimal string with 18 fractional digits.
    async fn get_bnb_allocation(&self, address: &str) -> Result<String, BscError>;
}

#[derive(Debug, Clone)]
pub struct BscConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl BscConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Explorer response envelope. `result` is a wei string on success and a human message otherwise.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// reqwest-backed [`BalanceClient`]. One GET per call, no retry.
#[derive(Debug, Clone)]
pub struct BscClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BscClient {
    pub fn new(config: BscConfig) -> Result<Self, BscError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "BSC client created"
        );
        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl BalanceClient for BscClient {
    #[instrument(skip(self))]
    async fn get_bnb_allocation(&self, address: &str) -> Result<String, BscError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "account"),
                ("action", "balance"),
                ("address", address),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: ApiResponse = response.json().await?;

        if body.status != "1" {
            warn!(status = %body.status, message = %body.message, "BSC API returned failure status");
            return Err(BscError::InvalidResponse(format!(
                "status is {} ({})",
                body.status, body.message
            )));
        }

        let wei = match body.result {
            serde_json::Value::String(s) => s,
            other => {
                return Err(BscError::InvalidResponse(format!(
                    "result is not a string: {}",
                    other
                )))
            }
        };
        if !wei.chars().all(|c| c.is_ascii_digit()) {
            return Err(BscError::InvalidResponse(format!(
                "result is not an integer amount: {}",
                wei
            )));
        }

        let bnb = format_units(&wei, BNB_DECIMALS);
        info!(address = %address, bnb = %bnb, "BNB allocation fetched");
        Ok(bnb)
    }
}

/// Inserts a decimal point `decimals` digits from the end of an integer string, left-padding with
/// zeros to at least `decimals + 1` digits so the result always has a leading integer digit.
///
/// `format_units("5", 18) == "0.000000000000000005"`
pub fn format_units(amount: &str, decimals: usize) -> String {
    let padded = format!("{:0>width$}", amount, width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    format!("{}.{}", int_part, frac_part)
}
