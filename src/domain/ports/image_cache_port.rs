//! Port definition for image caching.

use std::sync::Arc;

use crate::domain::entities::ImageId;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors raised by a cache store itself (never by a lookup).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// I/O error while preparing or writing the store.
    #[error("IO error: {0}")]
    IoError(String),
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    ClientError(String),
}

/// Port for the in-memory image tier.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Looks up an image. Returns None if not cached.
    async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>>;

    /// Inserts an image, replacing any previous entry for the id.
    async fn put(&self, id: ImageId, image: Arc<image::DynamicImage>);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
