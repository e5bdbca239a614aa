//! Chain handlers for the bot.

mod assistant_handler;

pub use assistant_handler::{collect_assistant_replies, AssistantHandler, MAX_TOOL_ROUNDS};
