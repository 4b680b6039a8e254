//! Image handling infrastructure.
//!
//! This module provides:
//! - Unbounded memory caching of decoded images
//! - Disk caching of raw downloaded bytes
//! - A `reqwest` transport for the network tier
//! - The memory -> disk -> network lookup pipeline

pub mod disk_cache;
pub mod fetch_cache;
pub mod http_client;
pub mod memory_cache;

pub use disk_cache::DiskImageCache;
pub use fetch_cache::ImageFetchCache;
pub use http_client::ReqwestTransport;
pub use memory_cache::{CacheStats, MemoryImageCache};
