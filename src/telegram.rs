//! Telegram Bot API client.
//!
//! Long-polls `getUpdates` and sends replies with `sendMessage`. The request
//! URL embeds the bot token, so transport errors are stripped of their URL
//! before they can reach a log line.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::{BotError, Result};
use crate::transport::{ChatTransport, InboundMessage, OutgoingReply, ParseMode};

/// Extra time on top of the long-poll window before the HTTP call gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Telegram(format!(
                "{} failed: {}",
                method,
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub message_thread_id: Option<i64>,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
}

impl From<Message> for InboundMessage {
    fn from(message: Message) -> Self {
        let sender = message
            .from
            .map(|user| user.username.unwrap_or_else(|| user.id.to_string()))
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            chat_id: message.chat.id,
            thread_id: message.message_thread_id,
            message_id: message.message_id,
            sender,
            text: message.text,
            reply_to_text: message.reply_to_message.and_then(|reply| reply.text),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

impl<'a> From<&'a OutgoingReply> for SendMessage<'a> {
    fn from(reply: &'a OutgoingReply) -> Self {
        Self {
            chat_id: reply.chat_id,
            text: &reply.text,
            message_thread_id: reply.thread_id,
            reply_to_message_id: reply.reply_to_message_id,
            parse_mode: reply.parse_mode,
        }
    }
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
    offset: AtomicI64,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + POLL_GRACE)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
            poll_timeout_secs: config.poll_timeout_secs,
            offset: AtomicI64::new(0),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);
        let response = self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Http(e.without_url()))?;

        // Bot API errors carry a JSON body with `ok: false`, so the status is not checked here
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Http(e.without_url()))?;
        envelope.into_result(method)
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(&self) -> Result<Vec<Update>> {
        let request = GetUpdates {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset.store(last + 1, Ordering::SeqCst);
        }
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }

    pub async fn send_message(&self, reply: &OutgoingReply) -> Result<()> {
        let _: serde_json::Value = self.call("sendMessage", &SendMessage::from(reply)).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn poll(&self) -> Result<Vec<InboundMessage>> {
        let updates = self.get_updates().await?;
        Ok(updates
            .into_iter()
            .filter_map(|update| update.message)
            .filter(|message| !message.from.as_ref().is_some_and(|user| user.is_bot))
            .map(InboundMessage::from)
            .collect())
    }

    async fn send(&self, reply: &OutgoingReply) -> Result<()> {
        self.send_message(reply).await
    }
}
