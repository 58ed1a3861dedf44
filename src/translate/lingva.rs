use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use super::provider::{check_status, non_empty, TranslationProvider};

#[derive(Debug, Deserialize)]
struct LingvaResponse {
    translation: Option<String>,
}

/// Lingva Translate, `GET {endpoint}/{source}/{target}/{text}`.
pub struct LingvaProvider {
    client: Client,
    endpoint: String,
}

impl LingvaProvider {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    fn request_url(&self, text: &str, target: &str, source: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ProviderError::Parse(format!("invalid lingva endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse("lingva endpoint cannot take path segments".to_string()))?
            .pop_if_empty()
            .extend([source, target, text]);
        Ok(url)
    }
}

#[async_trait]
impl TranslationProvider for LingvaProvider {
    async fn translate(&self, text: &str, target: &str, source: &str) -> Result<String, ProviderError> {
        debug!("Lingva: translating from {} to {}", source, target);

        let url = self.request_url(text, target, source)?;
        let response = self.client.get(url).send().await?;
        let body: LingvaResponse = check_status(response)?.json().await?;

        non_empty(body.translation.unwrap_or_default())
    }
}
