use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::language::LanguageCode;

/// Cache key: exact source text plus target language.
///
/// The source language is not part of the key, so the same text translated
/// into the same target shares one entry regardless of how it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub target: LanguageCode,
}

impl CacheKey {
    pub fn new(text: impl Into<String>, target: LanguageCode) -> Self {
        Self {
            text: text.into(),
            target,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", crate::preview(&self.text), self.target)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    translated_text: String,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub inserts: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// In-memory translation cache with lazy TTL expiry.
///
/// A disabled cache never stores anything and every lookup misses.
pub struct TranslationCache {
    enabled: bool,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    inserts: AtomicU64,
}

impl TranslationCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            enabled,
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO)
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get(key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        if entry.created_at.elapsed() >= self.ttl {
            entries.remove(key);
            self.expired.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache expired for key: {}", key);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Cache hit for key: {}", key);
        Some(entry.translated_text.clone())
    }

    pub async fn put(&self, key: CacheKey, translated_text: String) {
        if !self.enabled {
            return;
        }

        debug!("Cached translation for key: {}", key);
        let entry = CacheEntry {
            translated_text,
            created_at: Instant::now(),
        };
        self.entries.lock().await.insert(key, entry);
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of stored entries, including ones that expired but were not read yet.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, LanguageCode::English)
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_within_ttl() {
        let cache = TranslationCache::new(true, TTL);
        cache.put(key("你好"), "Hello".to_string()).await;

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert_eq!(cache.get(&key("你好")).await.as_deref(), Some("Hello"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_at_ttl() {
        let cache = TranslationCache::new(true, TTL);
        cache.put(key("你好"), "Hello".to_string()).await;

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get(&key("你好")).await, None);
        // expired entries are evicted on read
        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().expired, 1);
    }

    #[tokio::test]
    async fn test_key_is_exact_match() {
        let cache = TranslationCache::new(true, TTL);
        cache.put(key("Hello"), "你好".to_string()).await;

        assert!(cache.get(&key("hello")).await.is_none());
        assert!(cache.get(&key("Hello ")).await.is_none());
        assert!(cache.get(&CacheKey::new("Hello", LanguageCode::ChineseSimplified)).await.is_none());
        assert!(cache.get(&key("Hello")).await.is_some());
    }

    #[tokio::test]
    async fn test_disabled_cache_discards_writes() {
        let cache = TranslationCache::disabled();
        cache.put(key("你好"), "Hello".to_string()).await;

        assert!(cache.get(&key("你好")).await.is_none());
        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().inserts, 0);
    }
}
