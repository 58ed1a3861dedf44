use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// An inbound chat message, reduced to what the router needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// Forum topic the message was posted in
    pub thread_id: Option<i64>,
    pub message_id: i64,
    /// Username if known, otherwise the numeric user id
    pub sender: String,
    pub text: Option<String>,
    /// Text of the message this one replies to
    pub reply_to_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub chat_id: i64,
    pub text: String,
    pub thread_id: Option<i64>,
    pub reply_to_message_id: Option<i64>,
    pub parse_mode: Option<ParseMode>,
}

impl OutgoingReply {
    /// Plain reply placed in the same conversation and topic as `msg`.
    pub fn in_thread_of(msg: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            chat_id: msg.chat_id,
            text: text.into(),
            thread_id: msg.thread_id,
            reply_to_message_id: None,
            parse_mode: None,
        }
    }

    pub fn replying_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = Some(parse_mode);
        self
    }
}

/// Chat platform the bot talks to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Waits for the next batch of inbound messages.
    async fn poll(&self) -> Result<Vec<InboundMessage>>;

    async fn send(&self, reply: &OutgoingReply) -> Result<()>;
}
