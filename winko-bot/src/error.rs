//! Handler-level error taxonomy. Per-call tool failures never reach this type; they become
//! tool output text (see [`crate::crypto::CapabilityError`]).

use assistant_gateway::RunStatus;
use dbot_core::{DbotError, HandlerError};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum WinkoError {
    /// Sender absent or itself a bot.
    #[error("invalid sender: {0}")]
    InvalidSender(&'static str),

    /// User or assistant record not found (or the store failed).
    #[error("lookup failed: {0}")]
    LookupFailure(String),

    /// Any assistant API or Telegram call failure, with the call site.
    #[error("{context}: {source}")]
    RemoteCallFailure {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    /// The run did not reach a usable state within the retry ceiling.
    #[error("run {run_id} is not completed after {retries} retries (last status: {status})")]
    RunNotCompleted {
        run_id: String,
        status: RunStatus,
        retries: u32,
    },
}

impl WinkoError {
    pub(crate) fn remote<E>(context: &'static str) -> impl FnOnce(E) -> WinkoError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| WinkoError::RemoteCallFailure {
            context,
            source: Box::new(source),
        }
    }
}

impl From<WinkoError> for DbotError {
    fn from(err: WinkoError) -> Self {
        match err {
            WinkoError::InvalidSender(reason) => HandlerError::InvalidSender(reason.to_string()).into(),
            WinkoError::LookupFailure(reason) => HandlerError::Lookup(reason).into(),
            other => HandlerError::State(other.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_gateway::GatewayError;

    #[test]
    fn test_remote_failure_keeps_context_and_source() {
        let err =
            WinkoError::remote::<GatewayError>("failed to create run")(GatewayError::Remote("boom".into()));
        assert_eq!(
            err.to_string(),
            "failed to create run: assistant API call failed: boom"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_conversion_into_core_error() {
        let core: DbotError = WinkoError::InvalidSender("chat user is bot").into();
        assert!(matches!(core, DbotError::Handler(HandlerError::InvalidSender(_))));

        let core: DbotError = WinkoError::RunNotCompleted {
            run_id: "run_1".into(),
            status: RunStatus::InProgress,
            retries: 5,
        }
        .into();
        assert!(core.to_string().contains("after 5 retries"));
    }
}
