mod http_transport_port;
mod image_cache_port;

pub use http_transport_port::{HttpResponse, HttpTransport};
pub use image_cache_port::{CacheError, CacheResult, ImageCachePort};
