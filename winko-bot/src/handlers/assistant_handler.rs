//! Relays a chat message to the assistant and sends back what it answered.
//!
//! **External interactions:** user and assistant stores (lookup), assistant API (thread, message,
//! run, tool outputs), BSC explorer through [`CryptoCapability`], Telegram through [`Bot`].

use std::sync::Arc;

use assistant_gateway::{AssistantGateway, MessageAuthor, ThreadMessage};
use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument, warn};

use crate::crypto::CryptoCapability;
use crate::error::WinkoError;
use crate::run_resolver::{RunOutcome, RunResolver};
use crate::store::{AssistantStore, UserRecord, UserStore};

/// Dispatch/submit rounds allowed per message before giving up on the run.
pub const MAX_TOOL_ROUNDS: u32 = 3;

/// Texts of the assistant messages at the head of a newest-first list, up to the first user message.
pub fn collect_assistant_replies(messages: &[ThreadMessage]) -> Vec<String> {
    messages
        .iter()
        .take_while(|m| m.author == MessageAuthor::Assistant)
        .filter_map(|m| m.text.clone())
        .collect()
}

#[derive(Clone)]
pub struct AssistantHandler {
    users: Arc<dyn UserStore>,
    assistants: Arc<dyn AssistantStore>,
    gateway: Arc<dyn AssistantGateway>,
    resolver: RunResolver,
    crypto: CryptoCapability,
    bot: Arc<dyn Bot>,
}

impl AssistantHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        assistants: Arc<dyn AssistantStore>,
        gateway: Arc<dyn AssistantGateway>,
        resolver: RunResolver,
        crypto: CryptoCapability,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            users,
            assistants,
            gateway,
            resolver,
            crypto,
            bot,
        }
    }

    /// Runs one full turn for `message` and returns the texts that were sent to the chat.
    #[instrument(skip(self, message), fields(user_id = message.sender_id(), chat_id = message.chat.id))]
    pub async fn process(&self, message: &Message) -> std::result::Result<Vec<String>, WinkoError> {
        let sender = message
            .sender
            .as_ref()
            .ok_or(WinkoError::InvalidSender("chat user is nil"))?;
        if sender.is_bot {
            return Err(WinkoError::InvalidSender("chat user is bot"));
        }

        let user = self
            .users
            .find_by_tg_id(sender.id)
            .await
            .map_err(|e| WinkoError::LookupFailure(format!("failed to get user: {:#}", e)))?
            .ok_or_else(|| WinkoError::LookupFailure(format!("user {} not found", sender.id)))?;

        let assistant = self
            .assistants
            .active_assistant()
            .await
            .map_err(|e| WinkoError::LookupFailure(format!("failed to get assistant: {:#}", e)))?
            .ok_or_else(|| WinkoError::LookupFailure("no active assistant".to_string()))?;

        let thread_id = self.thread_for(&user).await?;

        if let Err(e) = self.gateway.send_message(&thread_id, &message.content).await {
            if !e.is_bad_request() {
                return Err(WinkoError::remote("failed to send message")(e));
            }
            warn!(thread_id = %thread_id, error = %e, "Message rejected, cancelling active run");
            let cancelled = self
                .gateway
                .cancel_active_run(&thread_id)
                .await
                .map_err(WinkoError::remote("failed to cancel active run"))?;
            info!(thread_id = %thread_id, cancelled, "Active runs cancelled");
        }

        let run = self
            .gateway
            .create_run(&thread_id, &assistant.id)
            .await
            .map_err(WinkoError::remote("failed to create run"))?;

        let messages = self.drive_run(&user, self.resolver.resolve(run).await?).await?;

        let replies = collect_assistant_replies(&messages);
        for text in &replies {
            self.bot
                .reply_to(message, text)
                .await
                .map_err(WinkoError::remote("failed to send reply"))?;
        }
        info!(reply_count = replies.len(), "Assistant replies sent");
        Ok(replies)
    }

    /// The user's last thread, or a freshly created one that is stored for next time.
    async fn thread_for(&self, user: &UserRecord) -> std::result::Result<String, WinkoError> {
        if let Some(ref thread_id) = user.last_thread_id {
            return Ok(thread_id.clone());
        }

        let thread_id = self
            .gateway
            .create_thread()
            .await
            .map_err(WinkoError::remote("failed to create thread"))?;
        self.users
            .set_last_thread(user.tg_user_id, &thread_id)
            .await
            .map_err(|e| WinkoError::LookupFailure(format!("failed to store thread: {:#}", e)))?;
        info!(tg_user_id = user.tg_user_id, thread_id = %thread_id, "Created thread for user");
        Ok(thread_id)
    }

    /// Answers function calls until the run completes, bounded by [`MAX_TOOL_ROUNDS`].
    async fn drive_run(
        &self,
        user: &UserRecord,
        mut outcome: RunOutcome,
    ) -> std::result::Result<Vec<ThreadMessage>, WinkoError> {
        let mut rounds = 0u32;
        loop {
            let (run, calls) = match outcome {
                RunOutcome::Messages(messages) => return Ok(messages),
                RunOutcome::FunctionCalls { run, calls } => (run, calls),
            };

            if rounds >= MAX_TOOL_ROUNDS {
                warn!(run_id = %run.id, rounds, "Run keeps requesting tool outputs");
                return Err(WinkoError::RunNotCompleted {
                    run_id: run.id,
                    status: run.status,
                    retries: rounds,
                });
            }
            rounds += 1;

            let outputs = self.crypto.dispatch_all(user, &calls).await;
            info!(run_id = %run.id, round = rounds, output_count = outputs.len(), "Submitting tool outputs");
            let resumed = self
                .gateway
                .submit_tool_outputs(&run.thread_id, &run.id, outputs)
                .await
                .map_err(WinkoError::remote("failed to submit tool outputs"))?;
            outcome = self.resolver.resolve(resumed).await?;
        }
    }
}

#[async_trait]
impl Handler for AssistantHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let replies = self.process(message).await?;
        if replies.is_empty() {
            return Ok(HandlerResponse::Stop);
        }
        Ok(HandlerResponse::Reply(replies.join("\n")))
    }
}
