//! Test doubles for the assistant API, the balance API and the chat transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assistant_gateway::{
    AssistantGateway, FunctionCall, GatewayError, Run, RunStatus, ThreadMessage, ToolOutput,
};
use async_trait::async_trait;
use bsc_client::{BalanceClient, BscError};
use chrono::Utc;
use dbot_core::{Bot, Chat, Message, User};

pub const THREAD_ID: &str = "thread_abc";
pub const NEW_THREAD_ID: &str = "thread_new";
pub const RUN_ID: &str = "run_1";

pub fn run(status: RunStatus) -> Run {
    Run {
        id: RUN_ID.to_string(),
        thread_id: THREAD_ID.to_string(),
        status,
        tool_calls: Vec::new(),
    }
}

pub fn run_with_calls(calls: Vec<FunctionCall>) -> Run {
    Run {
        tool_calls: calls,
        ..run(RunStatus::RequiresAction)
    }
}

pub fn call(id: &str, name: &str, arguments: &str) -> FunctionCall {
    FunctionCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

pub fn text_message(sender: Option<User>, content: &str) -> Message {
    Message {
        id: "42".to_string(),
        sender,
        chat: Chat {
            id: 504459620,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

pub fn human(id: i64) -> User {
    User {
        id,
        is_bot: false,
        username: Some("ann".to_string()),
        first_name: Some("Ann".to_string()),
    }
}

/// Scripted assistant API. `retrieve_run` and `submit_tool_outputs` pop from their queues and
/// fall back to the last scripted run once a queue is empty.
pub struct FakeGateway {
    created_run: Mutex<Run>,
    retrieves: Mutex<VecDeque<Run>>,
    submits: Mutex<VecDeque<Run>>,
    messages: Mutex<Vec<ThreadMessage>>,
    reject_send: Mutex<Option<GatewayError>>,
    last_run: Mutex<Option<Run>>,

    pub sent: Mutex<Vec<(String, String)>>,
    pub submitted: Mutex<Vec<Vec<ToolOutput>>>,
    pub create_thread_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub create_run_calls: AtomicUsize,
    pub retrieve_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new(created_run: Run) -> Self {
        Self {
            created_run: Mutex::new(created_run),
            retrieves: Mutex::new(VecDeque::new()),
            submits: Mutex::new(VecDeque::new()),
            messages: Mutex::new(Vec::new()),
            reject_send: Mutex::new(None),
            last_run: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            create_thread_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
            create_run_calls: AtomicUsize::new(0),
            retrieve_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_retrieves(self, runs: Vec<Run>) -> Self {
        *self.retrieves.lock().unwrap() = runs.into();
        self
    }

    pub fn with_submits(self, runs: Vec<Run>) -> Self {
        *self.submits.lock().unwrap() = runs.into();
        self
    }

    pub fn with_messages(self, messages: Vec<ThreadMessage>) -> Self {
        *self.messages.lock().unwrap() = messages;
        self
    }

    pub fn rejecting_send(self, err: GatewayError) -> Self {
        *self.reject_send.lock().unwrap() = Some(err);
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Calls of any kind; zero means the gateway was never touched.
    pub fn total_calls(&self) -> usize {
        [
            &self.create_thread_calls,
            &self.send_calls,
            &self.create_run_calls,
            &self.retrieve_calls,
            &self.list_calls,
            &self.cancel_calls,
        ]
        .iter()
        .map(|c| Self::count(c))
        .sum::<usize>()
            + self.submitted.lock().unwrap().len()
    }

    fn next(&self, queue: &Mutex<VecDeque<Run>>) -> Run {
        let mut last = self.last_run.lock().unwrap();
        let run = queue
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| last.clone())
            .unwrap_or_else(|| self.created_run.lock().unwrap().clone());
        *last = Some(run.clone());
        run
    }
}

#[async_trait]
impl AssistantGateway for FakeGateway {
    async fn create_thread(&self) -> Result<String, GatewayError> {
        self.create_thread_calls.fetch_add(1, Ordering::SeqCst);
        Ok(NEW_THREAD_ID.to_string())
    }

    async fn send_message(&self, thread_id: &str, text: &str) -> Result<(), GatewayError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((thread_id.to_string(), text.to_string()));
        match self.reject_send.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn create_run(&self, thread_id: &str, _assistant_id: &str) -> Result<Run, GatewayError> {
        self.create_run_calls.fetch_add(1, Ordering::SeqCst);
        let mut run = self.created_run.lock().unwrap().clone();
        run.thread_id = thread_id.to_string();
        *self.last_run.lock().unwrap() = Some(run.clone());
        Ok(run)
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run, GatewayError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.next(&self.retrieves))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run, GatewayError> {
        self.submitted.lock().unwrap().push(outputs);
        Ok(self.next(&self.submits))
    }

    async fn cancel_active_run(&self, _thread_id: &str) -> Result<usize, GatewayError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}

/// Balance API returning a fixed amount and recording queried addresses.
pub struct FakeBalance {
    pub amount: String,
    pub queried: Mutex<Vec<String>>,
}

impl FakeBalance {
    pub fn new(amount: &str) -> Self {
        Self {
            amount: amount.to_string(),
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queried.lock().unwrap().len()
    }
}

#[async_trait]
impl BalanceClient for FakeBalance {
    async fn get_bnb_allocation(&self, address: &str) -> Result<String, BscError> {
        self.queried.lock().unwrap().push(address.to_string());
        Ok(self.amount.clone())
    }
}

/// Chat transport that records plain sends and replies separately.
#[derive(Default)]
pub struct RecordingBot {
    pub sent: Mutex<Vec<(i64, String)>>,
    /// `(chat id, replied-to message id, text)`.
    pub replies: Mutex<Vec<(i64, String, String)>>,
}

impl RecordingBot {
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> dbot_core::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> dbot_core::Result<()> {
        self.replies
            .lock()
            .unwrap()
            .push((message.chat.id, message.id.clone(), text.to_string()));
        Ok(())
    }
}
