// Translation resolution pipeline
//
// classify -> cache -> provider fallback chain -> cache write.
// Backends are looked up by identifier in a registry so new providers can be
// added without touching the chain.

pub mod chain;
pub mod google;
pub mod libre;
pub mod lingva;
pub mod provider;

use tracing::{debug, info};

pub use chain::FallbackChain;
pub use provider::{build_http_client, ProviderRegistry, TranslationProvider};
use crate::cache::{CacheKey, TranslationCache};
use crate::config::Config;
use crate::error::{Result, TranslateError};
use crate::language::{classify, LanguageCode};
use crate::preview;

/// One translation call. `source_language: None` means auto-detect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_language: Option<LanguageCode>,
    pub target_language: LanguageCode,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>, target_language: LanguageCode) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: None,
            target_language,
        }
    }

    pub fn from_language(mut self, source_language: LanguageCode) -> Self {
        self.source_language = Some(source_language);
        self
    }
}

/// Result of [`TranslationResolver::translate_detected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub original: String,
    pub translated: String,
    pub source: LanguageCode,
    pub target: LanguageCode,
}

/// Single entry point for turning text into a translation.
pub struct TranslationResolver {
    cache: TranslationCache,
    chain: FallbackChain,
}

impl TranslationResolver {
    pub fn new(cache: TranslationCache, chain: FallbackChain) -> Self {
        Self { cache, chain }
    }

    /// Resolver wired with the built-in providers and the configured cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(config.api_timeout())?;
        let registry = ProviderRegistry::with_defaults(client, &config.providers);
        let chain = FallbackChain::new(registry, &config.translation.api_priority, config.api_timeout());
        let cache = TranslationCache::new(config.bot.enable_cache, config.cache_ttl());

        info!(
            "Translation service initialized. API priority: {}",
            chain.priority().join(", ")
        );
        Ok(Self::new(cache, chain))
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub async fn resolve(
        &self,
        text: &str,
        target: LanguageCode,
        source: Option<LanguageCode>,
    ) -> std::result::Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let source = match source {
            Some(source) => source,
            None => {
                let detected = classify(text);
                debug!("Auto-detected source language as: {}", detected);
                detected
            }
        };

        if source.primary_subtag() == target.primary_subtag() {
            debug!("Source ({}) and target ({}) languages are the same, skipping translation", source, target);
            return Ok(text.to_string());
        }

        let key = CacheKey::new(text, target);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let translated = self.chain.translate(text, target, source).await?;
        self.cache.put(key, translated.clone()).await;
        Ok(translated)
    }

    pub async fn resolve_request(&self, request: &TranslationRequest) -> std::result::Result<String, TranslateError> {
        self.resolve(&request.source_text, request.target_language, request.source_language)
            .await
    }

    /// Detects the language of `text` and translates it into the other one.
    pub async fn translate_detected(&self, text: &str) -> std::result::Result<Translation, TranslateError> {
        let source = classify(text);
        let target = source.opposite();
        debug!("Translating \"{}\" {} → {}", preview(text), source, target);

        let translated = self.resolve(text, target, Some(source)).await?;
        Ok(Translation {
            original: text.to_string(),
            translated,
            source,
            target,
        })
    }
}
