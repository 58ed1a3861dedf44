use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::{ProviderError, TranslateError};
use crate::language::LanguageCode;
use crate::preview;
use super::provider::{normalize_id, ProviderRegistry};

/// Tries providers in priority order until one returns a translation.
pub struct FallbackChain {
    registry: ProviderRegistry,
    priority: Vec<String>,
    timeout: Duration,
}

impl FallbackChain {
    pub fn new(registry: ProviderRegistry, priority: &[String], timeout: Duration) -> Self {
        let priority: Vec<String> = priority.iter().map(|id| normalize_id(id)).collect();
        for id in &priority {
            if !registry.contains(id) {
                warn!("Unknown translation API '{}' in priority list, it will be skipped", id);
            }
        }

        Self {
            registry,
            priority,
            timeout,
        }
    }

    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    pub async fn translate(
        &self,
        text: &str,
        target: LanguageCode,
        source: LanguageCode,
    ) -> Result<String, TranslateError> {
        let (from, to) = (source.primary_subtag(), target.primary_subtag());
        let mut attempted = Vec::new();

        for id in &self.priority {
            let Some(provider) = self.registry.get(id) else {
                warn!("Unknown translation API specified: {}", id);
                continue;
            };
            attempted.push(id.clone());

            debug!("Attempting translation with {}: {} → {}", id, from, to);
            let outcome = match tokio::time::timeout(self.timeout, provider.translate(text, to, from)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
            };

            match outcome.and_then(|translated| {
                if translated.trim().is_empty() {
                    Err(ProviderError::Empty)
                } else {
                    Ok(translated)
                }
            }) {
                Ok(translated) => {
                    info!(
                        "Translation successful with {}: \"{}\" → \"{}\"",
                        id,
                        preview(text),
                        preview(&translated)
                    );
                    return Ok(translated);
                }
                Err(e) => {
                    warn!("Translation with {} failed: {}", id, e);
                }
            }
        }

        error!("All translation APIs failed for text: \"{}\"", preview(text));
        Err(TranslateError::AllProvidersFailed { attempted })
    }
}
