//! # Assistant gateway
//!
//! Defines the [`AssistantGateway`] trait (stateless request/response calls against a hosted
//! assistant: threads, messages, runs, tool outputs) and its OpenAI implementation.
//! Callers work with the crate's own [`Run`], [`FunctionCall`], [`ToolOutput`] and
//! [`ThreadMessage`] types, never with async-openai types.

use async_trait::async_trait;

mod error;
mod openai_gateway;
mod types;

pub use error::GatewayError;
pub use openai_gateway::OpenAIAssistantGateway;
pub use types::{
    FunctionCall, FunctionTool, MessageAuthor, Run, RunStatus, ThreadMessage, ToolOutput,
};

/// Remote assistant operations. Every method is one remote call (except `cancel_active_run`,
/// which lists then cancels) and keeps no local state.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Creates an empty conversation thread and returns its id.
    async fn create_thread(&self) -> Result<String, GatewayError>;

    /// Appends a user-authored text message to the thread.
    async fn send_message(&self, thread_id: &str, text: &str) -> Result<(), GatewayError>;

    /// Starts a run of `assistant_id` against the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, GatewayError>;

    /// Fetches the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, GatewayError>;

    /// Lists thread messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, GatewayError>;

    /// Submits one output per pending function call and returns the resumed run.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run, GatewayError>;

    /// Cancels every run of the thread that is waiting on tool outputs. Returns how many were cancelled.
    async fn cancel_active_run(&self, thread_id: &str) -> Result<usize, GatewayError>;
}
