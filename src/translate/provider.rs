use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ProviderEndpoints;
use crate::error::{ProviderError, Result};
use super::{google::GoogleProvider, libre::LibreProvider, lingva::LingvaProvider};

/// A single translation backend.
///
/// Language arguments are ISO 639-1 primary subtags (`"zh"`, `"en"`).
/// Implementations must never report an empty string as success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, target: &str, source: &str) -> std::result::Result<String, ProviderError>;
}

/// Maps provider identifiers to their implementations.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn TranslationProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `google`, `libre` and `lingva` backends.
    pub fn with_defaults(client: Client, endpoints: &ProviderEndpoints) -> Self {
        let mut registry = Self::new();
        registry.register("google", Arc::new(GoogleProvider::new(client.clone(), &endpoints.google_url)));
        registry.register("libre", Arc::new(LibreProvider::new(client.clone(), &endpoints.libre_url)));
        registry.register("lingva", Arc::new(LingvaProvider::new(client, &endpoints.lingva_url)));
        registry
    }

    pub fn register(&mut self, id: &str, provider: Arc<dyn TranslationProvider>) {
        self.providers.insert(normalize_id(id), provider);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn TranslationProvider>> {
        self.providers.get(&normalize_id(id)).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(&normalize_id(id))
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

pub fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Shared HTTP client for provider calls, bounded by the per-call timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Rejects blank provider output.
pub(crate) fn non_empty(text: String) -> std::result::Result<String, ProviderError> {
    if text.trim().is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(text)
    }
}

/// Maps non-2xx responses to [`ProviderError::Status`].
pub(crate) fn check_status(response: reqwest::Response) -> std::result::Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Status(status.as_u16()))
    }
}
