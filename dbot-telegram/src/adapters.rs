//! Adapters from Telegram (teloxide) types to dbot_core types.

use dbot_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            is_bot: self.0.is_bot,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.0.to_string(),
            sender: self.0.from.as_ref().map(|u| TelegramUserWrapper(u).to_core()),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: if self.0.chat.is_private() {
                    "private".to_string()
                } else {
                    "group".to_string()
                },
            },
            content: self.0.text().unwrap_or("").to_string(),
            created_at: self.0.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> teloxide::types::Message {
        serde_json::from_str(json).expect("valid Telegram message JSON")
    }

    /// **Test: A private text message maps sender, chat and content.**
    #[test]
    fn test_message_wrapper_to_core() {
        let msg = parse(
            r#"{
                "message_id": 17,
                "date": 1706529600,
                "chat": {"id": 504459620, "type": "private", "first_name": "Ann"},
                "from": {"id": 504459620, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "text": "what is my balance?"
            }"#,
        );

        let core = TelegramMessageWrapper(&msg).to_core();

        assert_eq!(core.id, "17");
        assert_eq!(core.chat.id, 504459620);
        assert_eq!(core.chat.chat_type, "private");
        assert_eq!(core.content, "what is my balance?");
        let sender = core.sender.expect("sender present");
        assert_eq!(sender.id, 504459620);
        assert!(!sender.is_bot);
        assert_eq!(sender.username.as_deref(), Some("ann"));
    }

    /// **Test: Bot flag is carried over so the handler can reject bot senders.**
    #[test]
    fn test_bot_sender_flag() {
        let msg = parse(
            r#"{
                "message_id": 3,
                "date": 1706529600,
                "chat": {"id": 99, "type": "private", "first_name": "Relay"},
                "from": {"id": 99, "is_bot": true, "first_name": "Relay"},
                "text": "ping"
            }"#,
        );

        let core = TelegramMessageWrapper(&msg).to_core();

        assert!(core.sender.unwrap().is_bot);
    }
}
