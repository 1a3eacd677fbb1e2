use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use teloxide::types::InlineKeyboardMarkup;
use tracing::debug;

use crate::config::TelegramConfig;

/// Body of a `sendMessage` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutboundMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_markup: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Delivers replies to a chat
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<()>;
}

/// Bot API client performing one `sendMessage` POST per reply
pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        debug!("Sending message to chat {}", message.chat_id);

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(message)
            .send()
            .await
            // reqwest errors embed the URL, which carries the token
            .map_err(|e| e.without_url())
            .context("Failed to send request to Telegram")?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error ({}): {}", status, error_body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teloxide::types::InlineKeyboardButton;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            api_url: server.uri(),
            ..TelegramConfig::default()
        })
    }

    #[test]
    fn test_plain_message_omits_reply_markup() {
        let value = serde_json::to_value(OutboundMessage::text(42, "Be kind.")).unwrap();
        assert_eq!(value, json!({"chat_id": 42, "text": "Be kind."}));
    }

    #[test]
    fn test_keyboard_wire_shape() {
        let keyboard =
            InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("Next", "/next")]]);
        let message = OutboundMessage::text(7, "Favourite film?").with_keyboard(keyboard);
        let value = serde_json::to_value(message).unwrap();
        assert_eq!(
            value,
            json!({
                "chat_id": 7,
                "text": "Favourite film?",
                "reply_markup": {
                    "inline_keyboard": [[{"text": "Next", "callback_data": "/next"}]]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_send_posts_to_token_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": 42, "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .send(&OutboundMessage::text(42, "hello"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"ok":false,"description":"Bad Request: message text is empty"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .send(&OutboundMessage::text(42, ""))
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("400"));
        assert!(message.contains("message text is empty"));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let client = TelegramClient::new(&TelegramConfig {
            bot_token: "123:secret".to_string(),
            api_url: "http://127.0.0.1:1".to_string(),
            ..TelegramConfig::default()
        });

        let err = client
            .send(&OutboundMessage::text(1, "hi"))
            .await
            .unwrap_err();
        assert!(!format!("{:#}", err).contains("secret"));
    }
}
