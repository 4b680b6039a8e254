//! Domain entities.

mod image;

pub use image::{ImageId, ImageSource, LoadedImage};
