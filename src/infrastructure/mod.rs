//! Infrastructure layer with adapters for storage, network and configuration.

/// Application configuration.
pub mod config;
/// Image caching, transport and lookup pipeline.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel};
pub use image::{
    CacheStats, DiskImageCache, ImageFetchCache, MemoryImageCache, ReqwestTransport,
};
