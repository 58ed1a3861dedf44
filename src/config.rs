use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{BotError, Result};
use crate::language::LanguageCode;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_DEFAULT_SOURCE_LANGUAGE: &str = "DEFAULT_SOURCE_LANGUAGE";
pub const ENV_DEFAULT_TARGET_LANGUAGE: &str = "DEFAULT_TARGET_LANGUAGE";
pub const ENV_API_PRIORITY: &str = "API_PRIORITY";
pub const ENV_API_TIMEOUT: &str = "API_TIMEOUT";
pub const ENV_AUTO_TRANSLATE: &str = "AUTO_TRANSLATE";
pub const ENV_ENABLE_CACHE: &str = "ENABLE_CACHE";
pub const ENV_CACHE_TTL: &str = "CACHE_TTL";

const FALLBACK_PROVIDER: &str = "google";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub translation: TranslateConfig,
    pub bot: BotConfig,
    pub providers: ProviderEndpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token. Usually supplied through the environment.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Bot API base URL
    pub api_base: String,
    /// Long-poll window for getUpdates (seconds)
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Language that triggers auto-translation
    pub default_source_language: LanguageCode,
    /// Language auto-translations are written in
    pub default_target_language: LanguageCode,
    /// Provider identifiers, tried in order
    pub api_priority: Vec<String>,
    /// Per-provider call timeout (milliseconds)
    pub api_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Translate messages in the source language without being asked
    pub auto_translate: bool,
    pub enable_cache: bool,
    /// Cache entry lifetime (milliseconds)
    pub cache_ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoints {
    pub google_url: String,
    pub libre_url: String,
    pub lingva_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_source_language: LanguageCode::ChineseSimplified,
            default_target_language: LanguageCode::English,
            api_priority: vec!["google".to_string(), "libre".to_string(), "lingva".to_string()],
            api_timeout_ms: 5000,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            auto_translate: false,
            enable_cache: true,
            cache_ttl_ms: 24 * 60 * 60 * 1000,
        }
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            google_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            libre_url: "https://libretranslate.de/translate".to_string(),
            lingva_url: "https://lingva.ml/api/v1".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| BotError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Loads the config file (explicit path, else `config.toml` if present,
    /// else defaults), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new("config.toml").exists() => {
                info!("Found config.toml in current directory, loading...");
                Self::from_file("config.toml")?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.normalize()?;
        Ok(config)
    }

    /// Overrides values with environment-style variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BOT_TOKEN) {
            self.telegram.token = Some(token);
        }
        if let Some(code) = lookup(ENV_DEFAULT_SOURCE_LANGUAGE) {
            self.translation.default_source_language = LanguageCode::from_str(&code)?;
        }
        if let Some(code) = lookup(ENV_DEFAULT_TARGET_LANGUAGE) {
            self.translation.default_target_language = LanguageCode::from_str(&code)?;
        }
        if let Some(priority) = lookup(ENV_API_PRIORITY) {
            self.translation.api_priority = priority.split(',').map(|s| s.to_string()).collect();
        }
        if let Some(timeout) = lookup(ENV_API_TIMEOUT) {
            self.translation.api_timeout_ms = parse_millis(ENV_API_TIMEOUT, &timeout)?;
        }
        if let Some(flag) = lookup(ENV_AUTO_TRANSLATE) {
            self.bot.auto_translate = flag.trim() == "true";
        }
        if let Some(flag) = lookup(ENV_ENABLE_CACHE) {
            self.bot.enable_cache = flag.trim() != "false";
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            self.bot.cache_ttl_ms = parse_millis(ENV_CACHE_TTL, &ttl)?;
        }
        Ok(())
    }

    /// Cleans up the provider list and checks cross-field constraints.
    pub fn normalize(&mut self) -> Result<()> {
        self.translation.api_priority = self.translation.api_priority
            .iter()
            .map(|id| id.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .collect();

        if self.translation.api_priority.is_empty() {
            warn!("API_PRIORITY is not set or empty. Defaulting to \"{}\".", FALLBACK_PROVIDER);
            self.translation.api_priority = vec![FALLBACK_PROVIDER.to_string()];
        }

        if self.translation.default_source_language == self.translation.default_target_language {
            return Err(BotError::Config(format!(
                "Default source and target languages must differ (both are {})",
                self.translation.default_source_language
            )));
        }

        if self.translation.api_timeout_ms == 0 {
            return Err(BotError::Config("API timeout must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// The bot token, required for serving.
    pub fn require_token(&self) -> Result<&str> {
        match self.telegram.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(BotError::Config(format!(
                "{} is not defined in your .env file or environment variables.",
                ENV_BOT_TOKEN
            ))),
        }
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.translation.api_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.bot.cache_ttl_ms)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded successfully.");
        if self.bot.auto_translate {
            info!(
                "Auto-translation of {} messages is ENABLED.",
                self.translation.default_source_language
            );
        } else {
            info!("Auto-translation is DISABLED.");
        }
        if self.bot.enable_cache {
            info!("Translation caching is ENABLED with TTL: {}s.", self.cache_ttl().as_secs());
        } else {
            info!("Translation caching is DISABLED.");
        }
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|e| {
        BotError::Config(format!("Invalid value '{}' for {}: {}", value, key, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use assert_fs::prelude::*;
    use tokio_test::{assert_err, assert_ok};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.translation.api_priority, vec!["google", "libre", "lingva"]);
        assert_eq!(config.api_timeout(), Duration::from_millis(5000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(86_400));
        assert!(config.bot.enable_cache);
        assert!(!config.bot.auto_translate);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        assert_ok!(config.apply_env(env(&[
            (ENV_BOT_TOKEN, "123:abc"),
            (ENV_API_PRIORITY, " Lingva , google "),
            (ENV_API_TIMEOUT, "2500"),
            (ENV_AUTO_TRANSLATE, "true"),
            (ENV_ENABLE_CACHE, "false"),
            (ENV_CACHE_TTL, "60000"),
        ])));
        assert_ok!(config.normalize());

        assert_eq!(config.require_token().unwrap(), "123:abc");
        assert_eq!(config.translation.api_priority, vec!["lingva", "google"]);
        assert_eq!(config.api_timeout(), Duration::from_millis(2500));
        assert!(config.bot.auto_translate);
        assert!(!config.bot.enable_cache);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_flag_semantics() {
        let mut config = Config::default();
        config.apply_env(env(&[(ENV_AUTO_TRANSLATE, "yes"), (ENV_ENABLE_CACHE, "0")])).unwrap();
        // only the literal "true" enables, only the literal "false" disables
        assert!(!config.bot.auto_translate);
        assert!(config.bot.enable_cache);
    }

    #[test]
    fn test_empty_priority_defaults_to_google() {
        let mut config = Config::default();
        config.apply_env(env(&[(ENV_API_PRIORITY, " , ")])).unwrap();
        assert_ok!(config.normalize());
        assert_eq!(config.translation.api_priority, vec!["google"]);
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = Config::default();
        assert!(matches!(config.require_token(), Err(BotError::Config(_))));

        let mut blank = Config::default();
        blank.apply_env(env(&[(ENV_BOT_TOKEN, "  ")])).unwrap();
        assert_err!(blank.require_token());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_err!(Config::default().apply_env(env(&[(ENV_API_TIMEOUT, "fast")])));
        assert_err!(Config::default().apply_env(env(&[(ENV_DEFAULT_TARGET_LANGUAGE, "fr")])));

        let mut same = Config::default();
        same.apply_env(env(&[(ENV_DEFAULT_TARGET_LANGUAGE, "zh-TW")])).unwrap();
        assert_err!(same.normalize());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str(
            r#"
[translation]
default_source_language = "en"
default_target_language = "zh"
api_priority = ["libre"]

[bot]
auto_translate = true

[providers]
libre_url = "http://localhost:5000/translate"
"#,
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.translation.default_source_language, LanguageCode::English);
        assert_eq!(config.translation.default_target_language, LanguageCode::ChineseSimplified);
        assert_eq!(config.translation.api_priority, vec!["libre"]);
        assert_eq!(config.translation.api_timeout_ms, 5000);
        assert!(config.bot.auto_translate);
        assert_eq!(config.providers.libre_url, "http://localhost:5000/translate");
        assert_eq!(config.providers.lingva_url, ProviderEndpoints::default().lingva_url);
    }

    #[test]
    fn test_from_file_rejects_bad_language() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str("[translation]\ndefault_source_language = \"ja\"\n").unwrap();

        assert!(matches!(Config::from_file(file.path()), Err(BotError::Config(_))));
    }
}
