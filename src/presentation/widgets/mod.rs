mod image_preview;
mod image_view;

pub use image_preview::{HalfBlockImage, ImagePreview, ImagePreviewStyle};
pub use image_view::{ImagePhase, ImageView};
