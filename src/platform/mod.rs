pub mod telegram;

use serde::Deserialize;

/// An event received from a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Free text typed by the user
    PlainMessage { text: String, chat_id: i64 },
    /// Token returned by a tapped inline keyboard button
    CallbackQuery { data: String, chat_id: i64 },
}

/// Subset of the Telegram `Update` object this bot reads.
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<IncomingCallback>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IncomingCallback {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Classify the update. Returns `None` when it carries neither a text
    /// message nor a callback query with data and a chat.
    pub fn into_event(self) -> Option<InboundEvent> {
        if let Some(message) = self.message {
            if let (Some(text), Some(chat)) = (message.text, message.chat) {
                return Some(InboundEvent::PlainMessage {
                    text,
                    chat_id: chat.id,
                });
            }
        }

        let callback = self.callback_query?;
        let data = callback.data?;
        let chat = callback.message?.chat?;
        Some(InboundEvent::CallbackQuery {
            data,
            chat_id: chat.id,
        })
    }
}
