//! OpenAI implementation of [`AssistantGateway`] on top of openai-client.

use async_trait::async_trait;
use openai_client::types::{
    AssistantTools, AssistantToolsFunction, CreateAssistantRequestArgs, FunctionObjectArgs,
    MessageContent, MessageObject, MessageRole, RunObject, RunStatus as OpenAIRunStatus,
    ToolsOutputs,
};
use openai_client::OpenAIClient;
use tracing::{info, instrument, warn};

use crate::{
    AssistantGateway, FunctionCall, FunctionTool, GatewayError, MessageAuthor, Run, RunStatus,
    ThreadMessage, ToolOutput,
};

/// [`AssistantGateway`] backed by the OpenAI assistants API.
#[derive(Clone)]
pub struct OpenAIAssistantGateway {
    client: OpenAIClient,
}

impl OpenAIAssistantGateway {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self::new(OpenAIClient::with_base_url(api_key, base_url))
    }

    /// Registers a new assistant exposing `functions` as function tools. Returns the assistant id.
    #[instrument(skip(self, instructions, functions))]
    pub async fn create_assistant(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
        functions: &[FunctionTool],
    ) -> Result<String, GatewayError> {
        let mut tools = Vec::with_capacity(functions.len());
        for tool in functions {
            let mut function = FunctionObjectArgs::default();
            function.name(tool.name.clone()).description(tool.description.clone());
            if let Some(ref parameters) = tool.parameters {
                function.parameters(parameters.clone());
            }
            tools.push(AssistantTools::Function(AssistantToolsFunction {
                function: function.build()?,
            }));
        }

        let request = CreateAssistantRequestArgs::default()
            .model(model)
            .name(name)
            .instructions(instructions)
            .tools(tools)
            .build()?;

        let assistant = self.client.create_assistant(request).await?;
        info!(assistant_id = %assistant.id, model = %model, "Assistant created");
        Ok(assistant.id)
    }
}

fn status_from_openai(status: &OpenAIRunStatus) -> RunStatus {
    match status {
        OpenAIRunStatus::Queued => RunStatus::Queued,
        OpenAIRunStatus::InProgress => RunStatus::InProgress,
        OpenAIRunStatus::RequiresAction => RunStatus::RequiresAction,
        OpenAIRunStatus::Cancelling => RunStatus::Cancelling,
        OpenAIRunStatus::Cancelled => RunStatus::Cancelled,
        OpenAIRunStatus::Failed => RunStatus::Failed,
        OpenAIRunStatus::Completed => RunStatus::Completed,
        OpenAIRunStatus::Expired => RunStatus::Expired,
        OpenAIRunStatus::Incomplete => RunStatus::Other,
    }
}

fn run_from_openai(run: RunObject) -> Run {
    let tool_calls = run
        .required_action
        .map(|action| {
            action
                .submit_tool_outputs
                .tool_calls
                .into_iter()
                .map(|call| FunctionCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect()
        })
        .unwrap_or_default();

    Run {
        status: status_from_openai(&run.status),
        id: run.id,
        thread_id: run.thread_id,
        tool_calls,
    }
}

fn message_from_openai(message: MessageObject) -> ThreadMessage {
    let author = match message.role {
        MessageRole::User => MessageAuthor::User,
        MessageRole::Assistant => MessageAuthor::Assistant,
    };
    let text = message.content.into_iter().next().and_then(|part| match part {
        MessageContent::Text(text) => Some(text.text.value),
        _ => None,
    });
    ThreadMessage { author, text }
}

#[async_trait]
impl AssistantGateway for OpenAIAssistantGateway {
    async fn create_thread(&self) -> Result<String, GatewayError> {
        Ok(self.client.create_thread().await?.id)
    }

    async fn send_message(&self, thread_id: &str, text: &str) -> Result<(), GatewayError> {
        self.client.create_message(thread_id, text).await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, GatewayError> {
        let run = self.client.create_run(thread_id, assistant_id).await?;
        Ok(run_from_openai(run))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, GatewayError> {
        let run = self.client.retrieve_run(thread_id, run_id).await?;
        Ok(run_from_openai(run))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, GatewayError> {
        let messages = self.client.list_messages(thread_id).await?;
        Ok(messages.into_iter().map(message_from_openai).collect())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run, GatewayError> {
        let tool_outputs = outputs
            .into_iter()
            .map(|o| ToolsOutputs {
                tool_call_id: Some(o.call_id),
                output: Some(o.output),
            })
            .collect();
        let run = self
            .client
            .submit_tool_outputs(thread_id, run_id, tool_outputs)
            .await?;
        Ok(run_from_openai(run))
    }

    #[instrument(skip(self))]
    async fn cancel_active_run(&self, thread_id: &str) -> Result<usize, GatewayError> {
        let runs = self.client.list_runs(thread_id).await?;
        let mut cancelled = 0;
        for run in runs
            .iter()
            .filter(|r| status_from_openai(&r.status) == RunStatus::RequiresAction)
        {
            warn!(thread_id = %thread_id, run_id = %run.id, "Cancelling run waiting on tool outputs");
            self.client.cancel_run(thread_id, &run.id).await?;
            cancelled += 1;
        }
        Ok(cancelled)
    }
}
