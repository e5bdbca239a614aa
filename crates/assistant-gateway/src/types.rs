//! Gateway-level data model: runs, function calls, tool outputs, thread messages.

use serde::{Deserialize, Serialize};

/// Lifecycle of a run as reported by the assistant API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    /// Any status this crate does not model explicitly.
    Other,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Expired => "expired",
            RunStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request from the assistant to execute a named function; `arguments` is a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Result for one [`FunctionCall`], correlated by `call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub call_id: String,
    pub output: String,
}

impl ToolOutput {
    pub fn new(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output: output.into(),
        }
    }
}

/// One invocation of an assistant against a thread. `tool_calls` is only populated while
/// the run is in `requires_action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    pub tool_calls: Vec<FunctionCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAuthor {
    User,
    Assistant,
}

/// A thread message reduced to its author and the text of its first content part (if text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub author: MessageAuthor,
    pub text: Option<String>,
}

impl ThreadMessage {
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            author: MessageAuthor::Assistant,
            text: Some(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: MessageAuthor::User,
            text: Some(text.into()),
        }
    }
}

/// Declaration of a function tool offered to the assistant when it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTool {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object; `None` for parameterless functions.
    pub parameters: Option<serde_json::Value>,
}
