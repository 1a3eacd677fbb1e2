use std::sync::Arc;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::platform::telegram::{MessageSender, OutboundMessage};
use crate::platform::InboundEvent;

/// Callback token carried by the "next topic" button
pub const NEXT_TOKEN: &str = "/next";

/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Rules,
    Next,
}

impl Command {
    /// Classify plain message text. Text with a `/` must be an exact known
    /// command (an `@botname` suffix is allowed); other non-empty text
    /// counts as a request for the next topic.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !text.contains('/') {
            return Some(Command::Next);
        }

        let command = match text.split_once('@') {
            Some((command, bot_name)) if !bot_name.is_empty() && !bot_name.contains(' ') => {
                command
            }
            _ => text,
        };

        match command {
            "/start" => Some(Command::Start),
            "/rules" => Some(Command::Rules),
            NEXT_TOKEN => Some(Command::Next),
            _ => None,
        }
    }

    /// Classify callback data from an inline button.
    pub fn from_callback(data: &str) -> Option<Self> {
        (data.trim() == NEXT_TOKEN).then_some(Command::Next)
    }
}

/// Shared application state, built once before the server starts
pub struct AppState {
    topics: Corpus,
    rules: String,
    next_button_label: String,
    sender: Arc<dyn MessageSender>,
}

impl AppState {
    pub fn new(
        config: &Config,
        topics: Corpus,
        rules: &Corpus,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            topics,
            rules: rules.joined(),
            next_button_label: config.telegram.next_button_label.clone(),
            sender,
        }
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn next_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            &self.next_button_label,
            NEXT_TOKEN,
        )]])
    }
}

/// Route one inbound event to its command handler. Failures are logged here
/// and never propagated.
pub async fn dispatch(state: &AppState, event: InboundEvent) {
    let (command, chat_id) = match &event {
        InboundEvent::PlainMessage { text, chat_id } => (Command::parse(text), *chat_id),
        InboundEvent::CallbackQuery { data, chat_id } => {
            (Command::from_callback(data), *chat_id)
        }
    };

    let Some(command) = command else {
        debug!("Ignoring {:?}", event);
        return;
    };

    info!("Command {:?} from chat {}", command, chat_id);

    match command {
        Command::Start | Command::Next => send_new_topic(state, chat_id).await,
        Command::Rules => send_rules(state, chat_id).await,
    }
}

async fn send_new_topic(state: &AppState, chat_id: i64) {
    let topic = state.topics.random().unwrap_or_default();
    let message = OutboundMessage::text(chat_id, topic).with_keyboard(state.next_keyboard());

    match state.sender.send(&message).await {
        Ok(()) => info!("New topic sent to chat {}", chat_id),
        Err(e) => error!("Failed to send new topic to chat {}: {:#}", chat_id, e),
    }
}

async fn send_rules(state: &AppState, chat_id: i64) {
    let message = OutboundMessage::text(chat_id, state.rules.as_str());

    match state.sender.send(&message).await {
        Ok(()) => info!("Rules sent to chat {}", chat_id),
        Err(e) => error!("Failed to send rules to chat {}: {:#}", chat_id, e),
    }
}
