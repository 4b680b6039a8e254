//! Presentation layer with the image view and its terminal front-end.

/// Event handling.
pub mod events;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::App;
pub use widgets::{ImagePhase, ImageView};
