//! In-memory image cache implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::ImageId;
use crate::domain::ports::ImageCachePort;

/// Unbounded in-memory cache of decoded images.
///
/// Entries live as long as the cache does; there is no eviction.
pub struct MemoryImageCache {
    cache: RwLock<HashMap<ImageId, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Checks for an entry without touching the hit/miss counters.
    pub async fn contains(&self, id: &ImageId) -> bool {
        self.cache.read().await.contains_key(id)
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        let cache = self.cache.read().await;
        if let Some(img) = cache.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache miss");
            None
        }
    }

    async fn put(&self, id: ImageId, image: Arc<image::DynamicImage>) {
        let mut cache = self.cache.write().await;
        debug!(id = %id, "Storing image in memory cache");
        cache.insert(id, image);
    }

    fn len(&self) -> usize {
        // Best-effort: reports 0 while a writer holds the lock.
        self.cache.try_read().map(|c| c.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_put_and_get() {
        let cache = MemoryImageCache::new();
        let id = ImageId::new("test1");
        let img = Arc::new(image::DynamicImage::new_rgb8(100, 100));

        cache.put(id.clone(), img.clone()).await;
        let retrieved = cache.get(&id).await;

        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().width(), 100);
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = MemoryImageCache::new();
        let result = cache.get(&ImageId::new("nonexistent")).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = MemoryImageCache::new();
        let id = ImageId::new("same");

        cache
            .put(id.clone(), Arc::new(image::DynamicImage::new_rgb8(1, 1)))
            .await;
        cache
            .put(id.clone(), Arc::new(image::DynamicImage::new_rgb8(8, 8)))
            .await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id).await.unwrap().width(), 8);
    }

    #[tokio::test]
    async fn test_no_eviction() {
        let cache = MemoryImageCache::new();
        let img = Arc::new(image::DynamicImage::new_rgb8(2, 2));

        for i in 0..500 {
            cache.put(ImageId::new(format!("img{i}")), img.clone()).await;
        }

        assert_eq!(cache.len(), 500);
        assert!(cache.contains(&ImageId::new("img0")).await);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = MemoryImageCache::new();
        let id = ImageId::new("test1");
        cache
            .put(id.clone(), Arc::new(image::DynamicImage::new_rgb8(10, 10)))
            .await;

        let _ = cache.get(&id).await;
        let _ = cache.get(&ImageId::new("missing")).await;

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);
    }
}
