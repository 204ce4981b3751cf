//! Explicit TTL cache for API responses.
//!
//! Keyed by `(method, canonical argument string)`, storing the parsed
//! JSON value and an expiry instant. Entries expire passively (an
//! expired entry reads as a miss) or are dropped explicitly after a
//! mutating call via [`ResponseCache::invalidate`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache key: endpoint method name plus canonicalized call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    method: &'static str,
    args: String,
}

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Mutex-guarded response cache shared by one client instance.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry, deserializing it back into the caller's type.
    ///
    /// Returns `None` on miss, expiry, or if the stored value no longer
    /// matches the requested type.
    pub fn get<T: DeserializeOwned>(&self, method: &'static str, args: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let key = CacheKey {
            method,
            args: args.to_string(),
        };
        let entry = entries.get(&key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Store a value with the given time-to-live.
    pub fn insert<T: Serialize>(&self, method: &'static str, args: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Skipping cache insert for {method}: {e}");
                return;
            }
        };

        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            CacheKey {
                method,
                args: args.to_string(),
            },
            CacheEntry {
                value: json,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every entry for a method, regardless of arguments.
    pub fn invalidate(&self, method: &'static str) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|key, _| key.method != method);
    }

    /// Drop expired entries. Called opportunistically; correctness does
    /// not depend on it since `get` checks expiry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|_, entry| entry.expires_at > now);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = ResponseCache::new();
        cache.insert("bookings", "2026-01-01..2026-01-31", &vec![1, 2, 3], Duration::from_secs(60));

        let hit: Option<Vec<i32>> = cache.get("bookings", "2026-01-01..2026-01-31");
        assert_eq!(hit, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_miss_on_different_args() {
        let cache = ResponseCache::new();
        cache.insert("bookings", "a", &1, Duration::from_secs(60));

        let miss: Option<i32> = cache.get("bookings", "b");
        assert!(miss.is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = ResponseCache::new();
        cache.insert("health", "", &true, Duration::ZERO);

        let miss: Option<bool> = cache.get("health", "");
        assert!(miss.is_none());
    }

    #[test]
    fn test_invalidate_drops_all_args_for_method() {
        let cache = ResponseCache::new();
        cache.insert("bookings", "a", &1, Duration::from_secs(60));
        cache.insert("bookings", "b", &2, Duration::from_secs(60));
        cache.insert("customers", "a", &3, Duration::from_secs(60));

        cache.invalidate("bookings");

        assert!(cache.get::<i32>("bookings", "a").is_none());
        assert!(cache.get::<i32>("bookings", "b").is_none());
        assert_eq!(cache.get::<i32>("customers", "a"), Some(3));
    }

    #[test]
    fn test_purge_expired() {
        let cache = ResponseCache::new();
        cache.insert("a", "", &1, Duration::ZERO);
        cache.insert("b", "", &2, Duration::from_secs(60));

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = ResponseCache::new();
        cache.insert("stats", "30", &10, Duration::from_secs(60));
        cache.insert("stats", "30", &20, Duration::from_secs(60));
        assert_eq!(cache.get::<i32>("stats", "30"), Some(20));
    }
}
