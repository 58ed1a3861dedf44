//! Transbot - Chinese/English translation bot for Telegram groups
//!
//! Watches group conversations, translates Chinese messages to English as
//! in-thread replies, and offers `/tc` and `/translatezh` commands for
//! on-demand translation in either direction.

pub mod bot;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod telegram;
pub mod translate;
pub mod transport;

const PREVIEW_CHARS: usize = 30;

/// Shortened text for log lines.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
