//! Time-bounded response cache
//!
//! Response bodies are memoized by a deterministic hash of the URL. An
//! entry stays fresh for the configured TTL; after that it is ignored and
//! the URL must be refetched.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A single cached response body
#[derive(Debug, Clone)]
struct CachedPage {
    body: String,
    fetched_at: DateTime<Utc>,
}

/// In-memory TTL cache of response bodies, keyed by URL hash
///
/// Owned by the [`Fetcher`](crate::fetch::Fetcher); not process-wide state,
/// so tests can substitute a fresh cache per run.
#[derive(Debug)]
pub struct PageCache {
    entries: HashMap<String, CachedPage>,
    ttl: Duration,
}

impl PageCache {
    /// Creates a cache whose entries expire after `ttl_hours`
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Returns the cached body for `url` if present and still fresh
    pub fn get(&self, url: &str) -> Option<&str> {
        let entry = self.entries.get(&cache_key(url))?;
        if Utc::now() - entry.fetched_at > self.ttl {
            return None;
        }
        Some(&entry.body)
    }

    /// Stores a response body for `url`, replacing any previous entry
    pub fn insert(&mut self, url: &str, body: String) {
        self.entries.insert(
            cache_key(url),
            CachedPage {
                body,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Number of entries, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic cache key: hex-encoded SHA-256 of the URL
fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_on_empty_cache() {
        let cache = PageCache::new(24);
        assert!(cache.get("https://example.com/").is_none());
    }

    #[test]
    fn test_hit_after_insert() {
        let mut cache = PageCache::new(24);
        cache.insert("https://example.com/", "<html></html>".to_string());
        assert_eq!(cache.get("https://example.com/"), Some("<html></html>"));
    }

    #[test]
    fn test_urls_do_not_collide() {
        let mut cache = PageCache::new(24);
        cache.insert("https://example.com/a", "page a".to_string());
        cache.insert("https://example.com/b", "page b".to_string());
        assert_eq!(cache.get("https://example.com/a"), Some("page a"));
        assert_eq!(cache.get("https://example.com/b"), Some("page b"));
    }

    #[test]
    fn test_stale_entry_is_a_miss() {
        let mut cache = PageCache::new(24);
        cache.insert("https://example.com/", "old body".to_string());

        // Backdate the entry past the TTL
        let key = cache_key("https://example.com/");
        cache.entries.get_mut(&key).unwrap().fetched_at = Utc::now() - Duration::hours(25);

        assert!(cache.get("https://example.com/").is_none());
    }

    #[test]
    fn test_entry_fresh_just_inside_ttl() {
        let mut cache = PageCache::new(24);
        cache.insert("https://example.com/", "body".to_string());

        let key = cache_key("https://example.com/");
        cache.entries.get_mut(&key).unwrap().fetched_at = Utc::now() - Duration::hours(23);

        assert!(cache.get("https://example.com/").is_some());
    }

    #[test]
    fn test_insert_replaces_previous_body() {
        let mut cache = PageCache::new(24);
        cache.insert("https://example.com/", "first".to_string());
        cache.insert("https://example.com/", "second".to_string());
        assert_eq!(cache.get("https://example.com/"), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_key_is_stable_hex_sha256() {
        let key = cache_key("https://example.com/");
        assert_eq!(key.len(), 64);
        assert_eq!(key, cache_key("https://example.com/"));
    }
}
