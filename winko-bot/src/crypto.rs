//! Crypto capability: the functions the assistant may call, and their dispatch.
//!
//! Function names arrive as free-form strings; they are mapped onto [`CryptoFunction`] so an
//! unrecognized name is an explicit case. Every call yields exactly one [`ToolOutput`]: failures
//! are rendered as the output text instead of aborting the batch.

use std::sync::Arc;

use assistant_gateway::{FunctionCall, FunctionTool, ToolOutput};
use bsc_client::{BalanceClient, BscError};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::store::UserRecord;

pub const GET_BNB_ALLOCATION: &str = "get_bnb_allocation";
pub const SEND_BNB_TO_ADDRESS: &str = "send_bnb_to_address";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoFunction {
    GetBnbAllocation,
    SendBnbToAddress,
}

impl CryptoFunction {
    pub const ALL: [CryptoFunction; 2] = [
        CryptoFunction::GetBnbAllocation,
        CryptoFunction::SendBnbToAddress,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            GET_BNB_ALLOCATION => Some(CryptoFunction::GetBnbAllocation),
            SEND_BNB_TO_ADDRESS => Some(CryptoFunction::SendBnbToAddress),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CryptoFunction::GetBnbAllocation => GET_BNB_ALLOCATION,
            CryptoFunction::SendBnbToAddress => SEND_BNB_TO_ADDRESS,
        }
    }

    /// Tool declaration registered with the assistant.
    pub fn tool(&self) -> FunctionTool {
        match self {
            CryptoFunction::GetBnbAllocation => FunctionTool {
                name: GET_BNB_ALLOCATION.to_string(),
                description: "get bnb allocation of user address".to_string(),
                parameters: None,
            },
            CryptoFunction::SendBnbToAddress => FunctionTool {
                name: SEND_BNB_TO_ADDRESS.to_string(),
                description: "send bnb token to recipient address".to_string(),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "amount": {
                            "type": "number",
                            "description": "Amount of bnb to send to recipient"
                        },
                        "recipient_address": {
                            "type": "string",
                            "description": "blockchain address of recipient to send bnb to"
                        }
                    },
                    "required": ["amount", "recipient_address"]
                })),
            },
        }
    }
}

/// All tool declarations, in registration order.
pub fn function_tools() -> Vec<FunctionTool> {
    CryptoFunction::ALL.iter().map(CryptoFunction::tool).collect()
}

/// Arguments of `send_bnb_to_address`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendBnbParams {
    pub recipient_address: String,
    #[serde(deserialize_with = "amount_as_string")]
    pub amount: String,
}

/// The declared schema says number, but models sometimes send a string.
fn amount_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "amount must be a number, got {}",
            other
        ))),
    }
}

/// Per-call failure. The `Display` text is what the assistant receives as the call's output.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("bnb wallet address is not set")]
    MissingWallet,

    #[error("failed to get bnb allocation")]
    Balance(#[source] BscError),

    #[error("failed to parse function arguments")]
    ArgumentParseFailure(#[source] serde_json::Error),

    #[error("sending bnb to the same address is not allowed")]
    PolicyRejection,

    #[error("unknown function: {0}")]
    UnknownFunction(String),
}

/// Canned transfer confirmation; no transaction is signed or broadcast.
pub fn stub_transfer(recipient_address: &str, amount: &str) -> String {
    format!(
        "Sending {} BNB to {} via blockchain...",
        amount, recipient_address
    )
}

#[derive(Clone)]
pub struct CryptoCapability {
    balance: Arc<dyn BalanceClient>,
}

impl CryptoCapability {
    pub fn new(balance: Arc<dyn BalanceClient>) -> Self {
        Self { balance }
    }

    /// Runs one function call for `user`.
    #[instrument(skip(self, user, call), fields(function = %call.name, call_id = %call.id))]
    pub async fn execute(
        &self,
        user: &UserRecord,
        call: &FunctionCall,
    ) -> Result<String, CapabilityError> {
        let function = CryptoFunction::from_name(&call.name)
            .ok_or_else(|| CapabilityError::UnknownFunction(call.name.clone()))?;

        match function {
            CryptoFunction::GetBnbAllocation => {
                let address = user
                    .wallet_address
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .ok_or(CapabilityError::MissingWallet)?;
                self.balance
                    .get_bnb_allocation(address)
                    .await
                    .map_err(CapabilityError::Balance)
            }
            CryptoFunction::SendBnbToAddress => {
                let params: SendBnbParams = serde_json::from_str(&call.arguments)
                    .map_err(CapabilityError::ArgumentParseFailure)?;
                let recipient = params.recipient_address.trim();
                let own_wallet = user
                    .wallet_address
                    .as_deref()
                    .is_some_and(|own| own.trim().eq_ignore_ascii_case(recipient));
                if own_wallet {
                    return Err(CapabilityError::PolicyRejection);
                }
                Ok(stub_transfer(&params.recipient_address, &params.amount))
            }
        }
    }

    /// Runs one call and always produces its output, downgrading failures to error text.
    pub async fn dispatch(&self, user: &UserRecord, call: &FunctionCall) -> ToolOutput {
        let output = match self.execute(user, call).await {
            Ok(output) => {
                info!(function = %call.name, call_id = %call.id, "Function call succeeded");
                output
            }
            Err(e) => {
                warn!(function = %call.name, call_id = %call.id, error = ?e, "Function call failed");
                e.to_string()
            }
        };
        ToolOutput::new(call.id.clone(), output)
    }

    /// One output per call, in call order.
    pub async fn dispatch_all(&self, user: &UserRecord, calls: &[FunctionCall]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            outputs.push(self.dispatch(user, call).await);
        }
        outputs
    }
}
