//! Two-level cache for provider responses
//!
//! Entries live in an in-memory [`TimedCache`] and, when a cache directory is
//! configured, in JSON files that survive between runs. Disk failures are
//! logged and treated as misses; the cache never fails a fetch.

use crate::config::CacheConfig;
use crate::error::{ResearchError, Result};
use cached::{Cached, TimedCache};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Cache key for provider requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// Provider operation, e.g. `overview` or `prices`
    pub endpoint: String,
    /// Additional parameters as JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(
        symbol: impl Into<String>,
        endpoint: impl Into<String>,
        params: impl Serialize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }

    /// Stable, filesystem-safe file name for the disk store
    pub fn file_name(&self) -> String {
        let params: String = self
            .params
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let mut name = format!("{}_{}", sanitize(&self.symbol), sanitize(&self.endpoint));
        if !params.is_empty() {
            name.push('_');
            name.push_str(&params);
        }
        name.push_str(".json");
        name
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    stored_at: u64,
    value: serde_json::Value,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Persistent JSON store with a per-store TTL
#[derive(Debug, Clone)]
struct DiskStore {
    dir: PathBuf,
    ttl: Duration,
}

impl DiskStore {
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let path = self.dir.join(key.file_name());
        let bytes = tokio::fs::read(&path).await.ok()?;

        let entry: DiskEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Discarding unreadable cache file {}: {}", path.display(), e);
                remove_cache_file(&path).await;
                return None;
            }
        };

        if now_secs().saturating_sub(entry.stored_at) >= self.ttl.as_secs() {
            tracing::debug!("Disk cache entry expired: {}", path.display());
            remove_cache_file(&path).await;
            return None;
        }

        Some(entry.value)
    }

    async fn insert(&self, key: &CacheKey, value: &serde_json::Value) {
        let path = self.dir.join(key.file_name());
        let entry = DiskEntry {
            stored_at: now_secs(),
            value: value.clone(),
        };

        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            let bytes = serde_json::to_vec(&entry).map_err(std::io::Error::other)?;
            tokio::fs::write(&path, bytes).await
        };

        if let Err(e) = write.await {
            tracing::warn!("Cache set error for {}: {}", path.display(), e);
        }
    }

    async fn remove(&self, key: &CacheKey) {
        remove_cache_file(&self.dir.join(key.file_name())).await;
    }
}

/// Remove a cache file, logging anything other than it already being gone
async fn remove_cache_file(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::debug!("Failed to remove cache file {}: {}", path.display(), e);
            false
        }
    }
}

/// Thread-safe cache for one class of data
pub struct StockCache {
    cache: Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>,
    disk: Option<DiskStore>,
    enabled: bool,
}

impl StockCache {
    /// Create a memory-only cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
            disk: None,
            enabled: true,
        }
    }

    /// Create a cache that also persists entries under `dir`
    pub fn with_disk(ttl: Duration, dir: impl Into<PathBuf>) -> Self {
        Self {
            disk: Some(DiskStore {
                dir: dir.into(),
                ttl,
            }),
            ..Self::new(ttl)
        }
    }

    /// A cache that stores nothing and always misses
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::from_secs(1))
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        if !self.enabled {
            return None;
        }

        {
            let mut cache = self.cache.write().await;
            if let Some(value) = cache.cache_get(key) {
                return Some(value.clone());
            }
        }

        let disk = self.disk.as_ref()?;
        let value = disk.get(key).await?;
        // Promote to memory so later lookups skip the filesystem
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key.clone(), value.clone());
        Some(value)
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        if !self.enabled {
            return;
        }
        if let Some(disk) = &self.disk {
            disk.insert(&key, &value).await;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and the result is cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        fetcher: F,
    ) -> std::result::Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<serde_json::Value, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Typed variant of [`get_or_fetch`](Self::get_or_fetch)
    ///
    /// A cached value that no longer deserializes into `T` is refetched.
    pub async fn get_or_fetch_typed<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key).await {
            match serde_json::from_value(value) {
                Ok(typed) => {
                    tracing::debug!("Cache hit for key: {:?}", key);
                    return Ok(typed);
                }
                Err(e) => {
                    tracing::warn!("Stale cache entry for {:?}: {}", key, e);
                    self.invalidate(&key).await;
                }
            }
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let typed = fetcher().await?;
        self.insert(key, serde_json::to_value(&typed)?).await;
        Ok(typed)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        if let Some(disk) = &self.disk {
            disk.remove(key).await;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear in-memory entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of in-memory entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for StockCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            disk: self.disk.clone(),
            enabled: self.enabled,
        }
    }
}

/// Tiered caches for different data types
#[derive(Clone)]
pub struct CacheManager {
    /// Price history, short TTL
    pub prices: StockCache,
    /// Profiles, statements, analyst and insider data, long TTL
    pub fundamentals: StockCache,
    dir: Option<PathBuf>,
}

impl CacheManager {
    /// Create from configuration; a disabled config yields pass-through caches
    pub fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            prices: StockCache::with_disk(config.price_ttl(), config.dir.join("prices")),
            fundamentals: StockCache::with_disk(config.ttl(), config.dir.join("fundamentals")),
            dir: Some(config.dir.clone()),
        }
    }

    /// Caching turned off
    pub fn disabled() -> Self {
        Self {
            prices: StockCache::disabled(),
            fundamentals: StockCache::disabled(),
            dir: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.prices.is_enabled() || self.fundamentals.is_enabled()
    }

    /// Clear memory tiers and remove the on-disk store
    pub async fn clear_all(&self) -> Result<()> {
        self.prices.clear().await;
        self.fundamentals.clear().await;
        if let Some(dir) = &self.dir {
            clear_dir(dir).await?;
        }
        Ok(())
    }
}

/// Remove every cached file under `dir`; a missing directory is not an error
pub async fn clear_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            tracing::info!("Cache cleared at {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ResearchError::Cache(format!(
            "failed to clear {}: {e}",
            dir.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_cache_key_creation() {
        let key = CacheKey::new("AAPL", "prices", json!({"years": 5}));
        assert_eq!(key.symbol, "AAPL");
        assert_eq!(key.endpoint, "prices");
        assert!(key.params.contains("years"));
        assert_eq!(key.file_name(), "AAPL_prices_years5.json");

        let key = CacheKey::new("BRK.B", "overview", ());
        assert_eq!(key.file_name(), "BRK-B_overview_null.json");
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = StockCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "overview", ());
        let value = json!({"price": 150.0});

        cache.insert(key.clone(), value.clone()).await;
        assert_eq!(cache.get(&key).await, Some(value));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = StockCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "overview", ());
        let value = json!({"price": 150.0});

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(value.clone()) }
            })
            .await
            .unwrap();
        assert_eq!(result, value);
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(json!(null)) }
            })
            .await
            .unwrap();
        assert_eq!(result, value);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let cache = StockCache::disabled();
        let key = CacheKey::new("AAPL", "overview", ());
        cache.insert(key.clone(), json!(1)).await;
        assert_eq!(cache.get(&key).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_disk_store_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let key = CacheKey::new("NVDA", "statements", ());

        let first = StockCache::with_disk(Duration::from_secs(3600), dir.path());
        first.insert(key.clone(), json!({"revenue": 60.9})).await;

        let second = StockCache::with_disk(Duration::from_secs(3600), dir.path());
        assert_eq!(second.get(&key).await, Some(json!({"revenue": 60.9})));
        assert_eq!(second.len().await, 1);
    }

    #[tokio::test]
    async fn test_disk_entry_expires() {
        let dir = tempfile::tempdir().unwrap();
        let key = CacheKey::new("NVDA", "prices", ());
        let stale = DiskEntry {
            stored_at: now_secs() - 7200,
            value: json!([1, 2, 3]),
        };
        std::fs::write(
            dir.path().join(key.file_name()),
            serde_json::to_vec(&stale).unwrap(),
        )
        .unwrap();

        let cache = StockCache::with_disk(Duration::from_secs(3600), dir.path());
        assert_eq!(cache.get(&key).await, None);
        assert!(!dir.path().join(key.file_name()).exists());
    }

    #[tokio::test]
    async fn test_unreadable_disk_entry_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let key = CacheKey::new("NVDA", "overview", ());
        let path = dir.path().join(key.file_name());
        std::fs::write(&path, b"not json").unwrap();

        let cache = StockCache::with_disk(Duration::from_secs(3600), dir.path());
        assert_eq!(cache.get(&key).await, None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_cache_file_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL_prices.json");
        std::fs::write(&path, b"{}").unwrap();

        assert!(remove_cache_file(&path).await);
        assert!(!remove_cache_file(&path).await);
        // A directory cannot be removed as a file; the error is logged, not raised
        assert!(!remove_cache_file(dir.path()).await);
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn test_typed_fetch_refetches_incompatible_entry() {
        let cache = StockCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AMD", "count", ());
        cache.insert(key.clone(), json!("not a number")).await;

        let value: u32 = cache
            .get_or_fetch_typed(key.clone(), || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(cache.get(&key).await, Some(json!(7)));
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache = StockCache::new(Duration::from_secs(60));
        for i in 0..3 {
            let key = CacheKey::new(format!("STOCK{i}"), "overview", ());
            cache.insert(key, json!({"price": i})).await;
        }
        assert_eq!(cache.len().await, 3);

        let key = CacheKey::new("STOCK0", "overview", ());
        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_manager_clear_all_removes_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().join("cache"),
            ..Default::default()
        };
        let manager = CacheManager::from_config(&config);
        let key = CacheKey::new("NVDA", "overview", ());
        manager.fundamentals.insert(key, json!({})).await;
        assert!(config.dir.join("fundamentals").exists());

        manager.clear_all().await.unwrap();
        assert!(!config.dir.exists());
        assert!(manager.fundamentals.is_empty().await);
    }

    #[tokio::test]
    async fn test_disabled_manager() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let manager = CacheManager::from_config(&config);
        assert!(!manager.is_enabled());
        assert!(manager.clear_all().await.is_ok());
    }
}
