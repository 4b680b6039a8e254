//! URL to image resolution through memory, disk and network.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, trace, warn};

use crate::domain::entities::{ImageId, ImageSource, LoadedImage};
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::ports::{CacheResult, HttpTransport, ImageCachePort};

use super::disk_cache::DiskImageCache;
use super::http_client::ReqwestTransport;
use super::memory_cache::MemoryImageCache;

/// Resolves URLs to decoded images.
///
/// Lookup order is memory, then disk, then a single HTTP GET. A successful
/// download is written through to both tiers. Concurrent lookups for the same
/// id are not coalesced; each may download and the last disk write wins.
pub struct ImageFetchCache {
    memory: Arc<dyn ImageCachePort>,
    disk: Arc<DiskImageCache>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for ImageFetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetchCache")
            .field("memory_len", &self.memory.len())
            .field("disk", &self.disk)
            .finish_non_exhaustive()
    }
}

impl ImageFetchCache {
    /// Creates a fetch cache from its three tiers.
    #[must_use]
    pub fn new(
        memory: Arc<dyn ImageCachePort>,
        disk: Arc<DiskImageCache>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            memory,
            disk,
            transport,
        }
    }

    /// Creates a fetch cache with a fresh memory tier, a disk tier in
    /// `cache_dir` and a `reqwest` transport.
    ///
    /// # Errors
    /// Returns error if the cache directory or HTTP client cannot be created.
    pub async fn with_defaults(cache_dir: PathBuf, timeout: Option<Duration>) -> CacheResult<Self> {
        let disk = Arc::new(DiskImageCache::new(cache_dir).await?);
        let transport = Arc::new(ReqwestTransport::new(timeout)?);
        Ok(Self::new(Arc::new(MemoryImageCache::new()), disk, transport))
    }

    /// Returns the disk tier.
    #[must_use]
    pub fn disk(&self) -> &DiskImageCache {
        &self.disk
    }

    /// Resolves an optional URL.
    ///
    /// `None` is not an error: it resolves to `Ok(None)` without touching
    /// any tier.
    ///
    /// # Errors
    /// Returns the reason the network tier produced no image.
    pub async fn get(&self, url: Option<&Url>) -> FetchResult<Option<LoadedImage>> {
        let Some(url) = url else {
            trace!("No URL given, nothing to load");
            return Ok(None);
        };

        self.load(url).await.map(Some)
    }

    /// Resolves an optional URL, logging and discarding any failure.
    pub async fn load_or_none(&self, url: Option<&Url>) -> Option<LoadedImage> {
        match self.get(url).await {
            Ok(image) => image,
            Err(e) => {
                debug!(error = %e, "Image lookup failed");
                None
            }
        }
    }

    /// Resolves a URL through memory, disk and network.
    ///
    /// # Errors
    /// Returns error on a transport failure, a status other than 200, or a
    /// body that does not decode as an image.
    pub async fn load(&self, url: &Url) -> FetchResult<LoadedImage> {
        let id = ImageId::from_url(url);

        if let Some(img) = self.memory.get(&id).await {
            return Ok(LoadedImage::new(id, img, ImageSource::MemoryCache));
        }

        if let Some(img) = self.disk.get(&id).await {
            self.memory.put(id.clone(), img.clone()).await;
            return Ok(LoadedImage::new(id, img, ImageSource::DiskCache));
        }

        debug!(id = %id, url = %url, "Downloading image from network");

        let response = self.transport.get(url).await?;
        if !response.is_ok() {
            return Err(FetchError::status(response.status));
        }

        let body = response.body;
        let bytes_for_decode = body.clone();
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes_for_decode))
            .await
            .map_err(|e| FetchError::decode(format!("Decode task panicked: {e}")))?
            .map_err(|e| FetchError::decode(e.to_string()))?;

        let img = Arc::new(decoded);
        self.memory.put(id.clone(), img.clone()).await;

        if let Err(e) = self.disk.put_bytes(&id, body).await {
            warn!(id = %id, error = %e, "Failed to cache to disk");
        }

        debug!(id = %id, source = "network", "Image loaded successfully");

        Ok(LoadedImage::new(id, img, ImageSource::Network))
    }
}
