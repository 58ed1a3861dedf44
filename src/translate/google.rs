use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;
use super::provider::{check_status, non_empty, TranslationProvider};

/// Unofficial Google Translate endpoint (`client=gtx`).
pub struct GoogleProvider {
    client: Client,
    endpoint: String,
}

impl GoogleProvider {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

/// Joins the first element of every chunk in `body[0]`.
fn extract_translation(body: &Value) -> Option<String> {
    let chunks = body.get(0)?.as_array()?;
    Some(
        chunks
            .iter()
            .filter_map(|chunk| chunk.get(0).and_then(Value::as_str))
            .collect(),
    )
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    async fn translate(&self, text: &str, target: &str, source: &str) -> Result<String, ProviderError> {
        debug!("Google: translating from {} to {}", source, target);

        let response = self.client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let body: Value = check_status(response)?.json().await?;
        let translation = extract_translation(&body)
            .ok_or_else(|| ProviderError::Parse("missing translation chunks".to_string()))?;

        non_empty(translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::translate::provider::test_support::{local_client, serve_once};

    #[test]
    fn test_extract_joins_chunks() {
        let body = json!([
            [["Hello. ", "你好。", null, null, 10], ["How are you?", "你好吗？", null, null, 10]],
            null,
            "zh-CN"
        ]);
        assert_eq!(extract_translation(&body).as_deref(), Some("Hello. How are you?"));
    }

    #[test]
    fn test_extract_rejects_unexpected_shape() {
        assert_eq!(extract_translation(&json!({"error": "bad"})), None);
        assert_eq!(extract_translation(&json!([null])), None);
    }

    #[tokio::test]
    async fn test_translate_sends_gtx_query() {
        let (base, server) = serve_once(200, r#"[[["Hello","你好",null,null,10]],null,"zh-CN"]"#).await;
        let provider = GoogleProvider::new(local_client(), &format!("{}/translate_a/single", base));

        let result = provider.translate("你好", "en", "zh").await;

        assert_eq!(result.unwrap(), "Hello");
        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /translate_a/single?client=gtx&sl=zh&tl=en&dt=t&q=%E4%BD%A0%E5%A5%BD HTTP/1.1"),
            "{}",
            request
        );
    }

    #[tokio::test]
    async fn test_translate_server_error_is_failure() {
        let (base, _server) = serve_once(500, r#"{"error":"internal"}"#).await;
        let provider = GoogleProvider::new(local_client(), &base);

        let result = provider.translate("你好", "en", "zh").await;

        assert!(matches!(result, Err(ProviderError::Status(500))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_translate_without_chunks_is_failure() {
        let (base, _server) = serve_once(200, r#"{"error":"bad request"}"#).await;
        let provider = GoogleProvider::new(local_client(), &base);

        let result = provider.translate("你好", "en", "zh").await;

        assert!(matches!(result, Err(ProviderError::Parse(_))), "{:?}", result);
    }
}
