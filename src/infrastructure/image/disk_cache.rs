//! Disk-based image cache for persistence across sessions.
//!
//! The directory itself is the index: one file per [`ImageId`], named by the
//! id, holding the raw bytes exactly as they were downloaded.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, error, trace, warn};

use crate::domain::entities::ImageId;
use crate::domain::ports::{CacheError, CacheResult};

/// Disk-based image cache that persists raw image bytes.
#[derive(Debug)]
pub struct DiskImageCache {
    cache_dir: PathBuf,
}

impl DiskImageCache {
    /// Opens a disk cache rooted at `cache_dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn new(cache_dir: PathBuf) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        debug!(path = %cache_dir.display(), "Opened disk image cache");

        Ok(Self { cache_dir })
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path for a cached image.
    #[must_use]
    pub fn cache_path(&self, id: &ImageId) -> PathBuf {
        self.cache_dir.join(id.as_str())
    }

    /// Gets raw image bytes from disk cache.
    pub async fn get_bytes(&self, id: &ImageId) -> Option<Vec<u8>> {
        let path = self.cache_path(id);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(id = %id, path = %path.display(), "Disk cache hit");
                Some(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(id = %id, "Disk cache miss");
                None
            }
            Err(e) => {
                warn!(id = %id, path = %path.display(), error = %e, "Failed to read cached image");
                None
            }
        }
    }

    /// Loads and decodes an image from disk cache.
    ///
    /// A file that does not decode is reported as a miss.
    pub async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        let bytes = self.get_bytes(id).await?;

        let result = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        match result {
            Ok(Ok(img)) => {
                debug!(id = %id, "Decoded image from disk cache");
                Some(Arc::new(img))
            }
            Ok(Err(e)) => {
                warn!(id = %id, error = %e, "Failed to decode cached image");
                None
            }
            Err(e) => {
                error!(id = %id, error = %e, "Decode task panicked");
                None
            }
        }
    }

    /// Stores raw bytes in the disk cache, replacing any previous file.
    ///
    /// The bytes go to a temporary file in the cache directory which is then
    /// renamed over the destination, so readers never see a partial file.
    ///
    /// # Errors
    /// Returns error if the file cannot be written or moved into place.
    pub async fn put_bytes(&self, id: &ImageId, bytes: Bytes) -> CacheResult<()> {
        let dir = self.cache_dir.clone();
        let path = self.cache_path(id);
        let size = bytes.len();

        let target = path.clone();
        tokio::task::spawn_blocking(move || -> CacheResult<()> {
            let mut file = tempfile::NamedTempFile::new_in(&dir)
                .map_err(|e| CacheError::IoError(format!("Failed to create temp file: {e}")))?;
            file.write_all(&bytes)
                .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;
            file.flush()
                .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))?;
            file.persist(&target).map_err(|e| {
                CacheError::IoError(format!("Failed to persist cache file: {}", e.error))
            })?;
            Ok(())
        })
        .await
        .map_err(|e| CacheError::IoError(format!("Write task panicked: {e}")))??;

        debug!(id = %id, path = %path.display(), size, "Stored image in disk cache");

        Ok(())
    }

    /// Checks if an image is cached.
    pub async fn contains(&self, id: &ImageId) -> bool {
        fs::try_exists(self.cache_path(id)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_cache() -> (DiskImageCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskImageCache::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        (cache, temp_dir)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_put_and_get_bytes() {
        let (cache, _temp) = create_test_cache().await;
        let id = ImageId::new("test1");

        cache
            .put_bytes(&id, Bytes::from_static(b"test image data"))
            .await
            .unwrap();
        let retrieved = cache.get_bytes(&id).await;

        assert_eq!(retrieved.as_deref(), Some(&b"test image data"[..]));
    }

    #[tokio::test]
    async fn test_file_is_named_by_id() {
        let (cache, temp) = create_test_cache().await;
        let id = ImageId::new("avatars_42_full.png");

        cache
            .put_bytes(&id, Bytes::from_static(b"abc"))
            .await
            .unwrap();

        let on_disk = std::fs::read(temp.path().join("avatars_42_full.png")).unwrap();
        assert_eq!(on_disk, b"abc");
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let (cache, _temp) = create_test_cache().await;
        let id = ImageId::new("nonexistent");

        assert!(cache.get_bytes(&id).await.is_none());
        assert!(cache.get(&id).await.is_none());
        assert!(!cache.contains(&id).await);
    }

    #[tokio::test]
    async fn test_put_overwrites_whole_file() {
        let (cache, _temp) = create_test_cache().await;
        let id = ImageId::new("img");

        cache
            .put_bytes(&id, Bytes::from_static(b"a much longer first payload"))
            .await
            .unwrap();
        cache
            .put_bytes(&id, Bytes::from_static(b"short"))
            .await
            .unwrap();

        assert_eq!(cache.get_bytes(&id).await.unwrap(), b"short");
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let (cache, temp) = create_test_cache().await;

        cache
            .put_bytes(&ImageId::new("one"), Bytes::from_static(b"1"))
            .await
            .unwrap();
        cache
            .put_bytes(&ImageId::new("two"), Bytes::from_static(b"2"))
            .await
            .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_get_decodes_image() {
        let (cache, _temp) = create_test_cache().await;
        let id = ImageId::new("pic.png");

        cache
            .put_bytes(&id, Bytes::from(png_bytes(4, 3)))
            .await
            .unwrap();

        let img = cache.get(&id).await.unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    #[tokio::test]
    async fn test_undecodable_file_is_a_miss() {
        let (cache, _temp) = create_test_cache().await;
        let id = ImageId::new("corrupt.png");

        cache
            .put_bytes(&id, Bytes::from_static(b"not an image"))
            .await
            .unwrap();

        assert!(cache.contains(&id).await);
        assert!(cache.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_miss() {
        let (cache, temp) = create_test_cache().await;
        let id = ImageId::new("folder.png");
        std::fs::create_dir(temp.path().join("folder.png")).unwrap();

        assert!(cache.contains(&id).await);
        assert!(cache.get_bytes(&id).await.is_none());
        assert!(cache.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_put_into_removed_directory_fails() {
        let (cache, temp) = create_test_cache().await;
        std::fs::remove_dir_all(temp.path()).unwrap();

        let result = cache
            .put_bytes(&ImageId::new("img"), Bytes::from_static(b"data"))
            .await;

        assert!(matches!(result, Err(CacheError::IoError(_))));
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");

        let cache = DiskImageCache::new(nested.clone()).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(cache.cache_dir(), nested.as_path());
    }
}
