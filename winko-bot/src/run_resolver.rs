//! Run Resolver: polls a run until it is completed or asks for tool outputs.
//!
//! The assistant API reports progress only through polling, so every status other than a
//! populated `requires_action` or `completed` is treated as "not yet" and re-fetched after a
//! fixed interval, at most `max_retries` times.

use std::sync::Arc;
use std::time::Duration;

use assistant_gateway::{AssistantGateway, FunctionCall, Run, RunStatus, ThreadMessage};
use tracing::{info, instrument, warn};

use crate::error::WinkoError;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Retry ceiling and wait between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_retries: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Where a run ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run completed; thread messages, newest first.
    Messages(Vec<ThreadMessage>),
    /// The run is waiting for one output per call.
    FunctionCalls { run: Run, calls: Vec<FunctionCall> },
}

#[derive(Clone)]
pub struct RunResolver {
    gateway: Arc<dyn AssistantGateway>,
    policy: PollPolicy,
}

impl RunResolver {
    pub fn new(gateway: Arc<dyn AssistantGateway>, policy: PollPolicy) -> Self {
        Self { gateway, policy }
    }

    #[instrument(skip(self, run), fields(run_id = %run.id, thread_id = %run.thread_id))]
    pub async fn resolve(&self, mut run: Run) -> Result<RunOutcome, WinkoError> {
        let mut retries = 0u32;

        loop {
            info!(status = %run.status, retries, "Observed run status");

            match run.status {
                RunStatus::RequiresAction if !run.tool_calls.is_empty() => {
                    let calls = run.tool_calls.clone();
                    info!(call_count = calls.len(), "Run requires tool outputs");
                    return Ok(RunOutcome::FunctionCalls { run, calls });
                }
                RunStatus::Completed => {
                    let messages = self
                        .gateway
                        .list_messages(&run.thread_id)
                        .await
                        .map_err(WinkoError::remote("failed to list messages"))?;
                    return Ok(RunOutcome::Messages(messages));
                }
                _ => {}
            }

            if retries >= self.policy.max_retries {
                warn!(status = %run.status, retries, "Run did not complete within the retry ceiling");
                return Err(WinkoError::RunNotCompleted {
                    run_id: run.id,
                    status: run.status,
                    retries,
                });
            }

            tokio::time::sleep(self.policy.interval).await;
            run = self
                .gateway
                .retrieve_run(&run.thread_id, &run.id)
                .await
                .map_err(WinkoError::remote("failed to retrieve run"))?;
            retries += 1;
        }
    }
}
