//! cache-async-image - remote image display backed by a memory and disk cache.
//!
//! The crate resolves an image URL through three tiers (an in-memory map, a
//! flat directory of downloaded files, and a single HTTP GET) and exposes an
//! [`ImageView`](presentation::ImageView) that renders a placeholder, the
//! image, or an error view depending on how that lookup ends.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing cache tiers, transport and configuration.
pub mod infrastructure;
/// Presentation layer containing the image view and terminal UI.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "cache-async-image";
