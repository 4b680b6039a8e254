//! Domain types for cached images.

use std::sync::Arc;

use reqwest::Url;

/// Identifier of a cached image, also used as its file name on disk.
///
/// Derived from the URL path alone: the leading `/` is dropped and the
/// remaining separators are flattened to `_`. Host, query and fragment are
/// ignored, so `https://a.com/img/x.png` and `https://b.com/img/x.png` share
/// the id `img_x.png` and overwrite each other's cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

/// Id used when the URL path is empty after stripping the root.
const ROOT_ID: &str = "_";

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    ///
    /// The value is used verbatim; callers are expected to pass something
    /// that is already a valid flat file name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an `ImageId` from a URL path.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let path = url.path();
        let relative = path.strip_prefix('/').unwrap_or(path);

        if relative.is_empty() {
            return Self(ROOT_ID.to_string());
        }

        Self(relative.replace(['/', '\\'], "_"))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Loaded from the in-memory cache.
    MemoryCache,
    /// Decoded from a file in the disk cache.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image together with the tier that produced it.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Cache identifier.
    pub id: ImageId,
    /// Decoded image data.
    pub image: Arc<image::DynamicImage>,
    /// Tier the image was served from.
    pub source: ImageSource,
}

impl LoadedImage {
    /// Creates a loaded image record.
    #[must_use]
    pub const fn new(id: ImageId, image: Arc<image::DynamicImage>, source: ImageSource) -> Self {
        Self { id, image, source }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
