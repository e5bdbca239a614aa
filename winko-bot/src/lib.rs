//! # winko-bot
//!
//! Telegram bot that relays each chat message to a hosted assistant, answers the assistant's
//! function calls (BNB balance lookup and a stubbed transfer) and replies with the assistant's text.
//!
//! - [`run_resolver`]: polls a run until completed or waiting on tool outputs.
//! - [`crypto`]: the callable functions and their dispatch.
//! - [`handlers::AssistantHandler`]: one conversation turn per incoming message.

pub mod assembly;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod facade;
pub mod handlers;
pub mod run_resolver;
pub mod store;

pub use cli::{Cli, Commands};
pub use config::BotConfig;
pub use error::WinkoError;
pub use facade::{check_balance, create_assistant, run_bot};
