use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure of a single translation backend. Recovered by the fallback chain.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("empty translation")]
    Empty,

    #[error("timed out after {0}ms")]
    Timeout(u64),
}

/// Outcome of a resolution that produced no translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("nothing to translate")]
    EmptyInput,

    #[error("all translation providers failed (tried: {})", attempted.join(", "))]
    AllProvidersFailed { attempted: Vec<String> },
}
