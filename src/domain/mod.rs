//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageId, ImageSource, LoadedImage};
pub use errors::{FetchError, FetchResult};
pub use ports::{CacheError, CacheResult, HttpResponse, HttpTransport, ImageCachePort};
