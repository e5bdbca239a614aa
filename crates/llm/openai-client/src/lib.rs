//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for the assistants surface used by the bot: threads,
//! thread messages, runs (create / retrieve / list / cancel / submit tool outputs) and
//! assistant creation. Provides token masking for safe logging.
//!
//! Errors are returned as [`OpenAIError`] so callers can tell API rejections from transport failures.

use async_openai::{
    config::OpenAIConfig,
    types::{
        AssistantObject, CreateAssistantRequest, CreateMessageRequestArgs, CreateRunRequestArgs,
        CreateThreadRequestArgs, MessageObject, MessageRole, RunObject,
        SubmitToolOutputsRunRequest, ThreadObject, ToolsOutputs,
    },
    Client,
};
use std::sync::Arc;
use tracing::{debug, info};

pub use async_openai::error::{ApiError, OpenAIError};
pub use async_openai::types;

/// Page size for list calls; the bot only looks at the head of a thread.
const LIST_LIMIT: &str = "20";

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// OpenAI assistants client. Cheap to clone; holds the masked key for log lines only.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    masked_key: String,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    /// Builds a client with a custom base URL (e.g. for proxies or compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        info!(base_url = %base_url, api_key = %masked_key, "OpenAI client with custom base URL");
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    /// Creates an empty conversation thread.
    pub async fn create_thread(&self) -> Result<ThreadObject, OpenAIError> {
        let request = CreateThreadRequestArgs::default().build()?;
        let thread = self.client.threads().create(request).await?;
        info!(thread_id = %thread.id, api_key = %self.masked_key, "OpenAI thread created");
        Ok(thread)
    }

    /// Appends a user message to the thread.
    pub async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<MessageObject, OpenAIError> {
        let request = CreateMessageRequestArgs::default()
            .role(MessageRole::User)
            .content(content.to_string())
            .build()?;
        debug!(thread_id = %thread_id, content_len = content.len(), "OpenAI create_message");
        self.client.threads().messages(thread_id).create(request).await
    }

    /// Lists the most recent thread messages, newest first.
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageObject>, OpenAIError> {
        let response = self
            .client
            .threads()
            .messages(thread_id)
            .list(&[("limit", LIST_LIMIT)])
            .await?;
        Ok(response.data)
    }

    pub async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunObject, OpenAIError> {
        let request = CreateRunRequestArgs::default()
            .assistant_id(assistant_id)
            .build()?;
        let run = self.client.threads().runs(thread_id).create(request).await?;
        info!(
            thread_id = %thread_id,
            run_id = %run.id,
            assistant_id = %assistant_id,
            api_key = %self.masked_key,
            "OpenAI run created"
        );
        Ok(run)
    }

    pub async fn retrieve_run(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunObject, OpenAIError> {
        self.client.threads().runs(thread_id).retrieve(run_id).await
    }

    pub async fn list_runs(&self, thread_id: &str) -> Result<Vec<RunObject>, OpenAIError> {
        let response = self
            .client
            .threads()
            .runs(thread_id)
            .list(&[("limit", LIST_LIMIT)])
            .await?;
        Ok(response.data)
    }

    pub async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject, OpenAIError> {
        info!(thread_id = %thread_id, run_id = %run_id, "OpenAI cancel_run");
        self.client.threads().runs(thread_id).cancel(run_id).await
    }

    pub async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        tool_outputs: Vec<ToolsOutputs>,
    ) -> Result<RunObject, OpenAIError> {
        info!(
            thread_id = %thread_id,
            run_id = %run_id,
            output_count = tool_outputs.len(),
            "OpenAI submit_tool_outputs"
        );
        let request = SubmitToolOutputsRunRequest {
            tool_outputs,
            stream: None,
        };
        self.client
            .threads()
            .runs(thread_id)
            .submit_tool_outputs(run_id, request)
            .await
    }

    pub async fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<AssistantObject, OpenAIError> {
        if let Ok(json) = serde_json::to_string_pretty(&request) {
            info!(request_json = %json, "OpenAI create_assistant request JSON");
        }
        self.client.assistants().create(request).await
    }
}
