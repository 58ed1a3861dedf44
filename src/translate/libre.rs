use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use super::provider::{check_status, non_empty, TranslationProvider};

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// LibreTranslate `/translate` endpoint.
pub struct LibreProvider {
    client: Client,
    endpoint: String,
}

impl LibreProvider {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreProvider {
    async fn translate(&self, text: &str, target: &str, source: &str) -> Result<String, ProviderError> {
        debug!("LibreTranslate: translating from {} to {}", source, target);

        let request = LibreRequest {
            q: text,
            source,
            target,
            format: "text",
        };

        let response = self.client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let body: LibreResponse = check_status(response)?.json().await?;
        non_empty(body.translated_text.unwrap_or_default())
    }
}
