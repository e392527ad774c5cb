/*!
 * Translation result caching.
 *
 * Finished page translations are stored under a key made of the provider,
 * the language pair and an identity for the translated content, so that
 * revisiting a page does not hit the network again. The storage medium belongs
 * to the [`ResultCache`] implementation; [`MemoryCache`] keeps entries in
 * process memory.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::PageText;

/// Cache key combining provider, language pair and content identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Provider configuration id
    pub provider: String,

    /// Source language code, `auto` when detected by the provider
    pub source_language: String,

    /// Requested target language code
    pub target_language: String,

    /// Selector, page address or content digest
    pub content_id: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(
        provider: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        content_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            content_id: content_id.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.provider, self.source_language, self.target_language, self.content_id
        )
    }
}

/// A stored page translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTranslation {
    /// Translated page
    pub page: PageText,
    /// Source language the provider reported
    pub source_language: String,
    /// Language the page was translated into
    pub target_language: String,
    /// Supported-table code of the last batch sent
    pub sent_target: String,
    /// Whether the entry is the result of a language fallback retry
    #[serde(default)]
    pub retried: bool,
}

/// Read-through/write-through store for page translations
///
/// Implementations own eviction, persistence and their own synchronization.
#[async_trait]
pub trait ResultCache: Send + Sync + fmt::Debug {
    /// Look up a translation
    async fn get(&self, key: &CacheKey) -> Option<CachedTranslation>;

    /// Store a translation
    async fn put(&self, key: CacheKey, translation: CachedTranslation);
}

/// Stable content identity for a page, as a sha256 hex digest
///
/// Group boundaries and fragment lengths are part of the digest, so pages that
/// only differ in how their text is grouped get different identities.
pub fn content_digest(page: &PageText) -> String {
    let mut hasher = Sha256::new();
    for group in page.groups() {
        hasher.update(format!("g{}:", group.len()).as_bytes());
        for fragment in group {
            hasher.update(format!("f{}:", fragment.len()).as_bytes());
            hasher.update(fragment.as_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// In-memory result cache with hit/miss statistics
#[derive(Debug, Clone)]
pub struct MemoryCache {
    /// Internal cache storage
    entries: Arc<RwLock<HashMap<CacheKey, CachedTranslation>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl MemoryCache {
    /// Create a new cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Drop all entries and reset statistics
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Result cache cleared");
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Enable or disable the cache
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedTranslation> {
        if !self.enabled {
            return None;
        }

        let found = self.entries.read().get(key).cloned();
        match found {
            Some(translation) => {
                *self.hits.write() += 1;
                debug!("Cache hit for {}", key);
                Some(translation)
            }
            None => {
                *self.misses.write() += 1;
                debug!("Cache miss for {}", key);
                None
            }
        }
    }

    async fn put(&self, key: CacheKey, translation: CachedTranslation) {
        if !self.enabled {
            return;
        }

        debug!("Cached translation for {}", key);
        self.entries.write().insert(key, translation);
    }
}
