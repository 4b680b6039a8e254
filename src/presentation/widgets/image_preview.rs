//! Terminal rendering for the three image view states.

use image::imageops::FilterType;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::domain::entities::LoadedImage;
use crate::domain::errors::FetchError;

/// Upper half block; foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "\u{2580}";

/// Colors used by [`ImagePreview`].
pub struct ImagePreviewStyle {
    /// Frame around the preview.
    pub border: Style,
    /// "Loading..." text.
    pub placeholder: Style,
    /// Image caption and error detail.
    pub caption: Style,
    /// Error headline.
    pub error: Style,
}

impl Default for ImagePreviewStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            placeholder: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            caption: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

/// Draws an image with two vertical pixels per terminal cell.
pub struct HalfBlockImage<'a> {
    image: &'a image::DynamicImage,
}

impl<'a> HalfBlockImage<'a> {
    /// Wraps a decoded image for drawing.
    #[must_use]
    pub const fn new(image: &'a image::DynamicImage) -> Self {
        Self { image }
    }
}

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.image.width() == 0 || self.image.height() == 0 {
            return;
        }

        let target_w = u32::from(area.width);
        let target_h = u32::from(area.height) * 2;
        let scaled = self
            .image
            .resize(target_w, target_h, FilterType::Triangle)
            .to_rgb8();

        let x_offset = (target_w.saturating_sub(scaled.width())) / 2;
        for y in 0..scaled.height().div_ceil(2) {
            for x in 0..scaled.width() {
                let top = scaled.get_pixel(x, y * 2);
                let bottom = if y * 2 + 1 < scaled.height() {
                    *scaled.get_pixel(x, y * 2 + 1)
                } else {
                    image::Rgb([0, 0, 0])
                };

                let (Ok(cx), Ok(cy)) = (
                    u16::try_from(x + x_offset),
                    u16::try_from(y),
                ) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

/// One of the three image view states, ready to draw.
pub enum ImagePreview<'a> {
    /// Lookup still running.
    Placeholder {
        /// Frame title.
        title: &'a str,
    },
    /// Lookup produced an image.
    Image {
        /// Frame title.
        title: &'a str,
        /// Image to draw.
        image: &'a LoadedImage,
    },
    /// Lookup produced no image.
    Error {
        /// Frame title.
        title: &'a str,
        /// Why, or `None` when there was no URL.
        reason: Option<&'a FetchError>,
    },
}

impl ImagePreview<'_> {
    fn title(&self) -> &str {
        match self {
            Self::Placeholder { title } | Self::Image { title, .. } | Self::Error { title, .. } => {
                *title
            }
        }
    }
}

impl Widget for ImagePreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = ImagePreviewStyle::default();
        let block = Block::bordered()
            .title(format!(" {} ", self.title()))
            .border_style(style.border);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.is_empty() {
            return;
        }

        match self {
            Self::Placeholder { .. } => {
                Paragraph::new(Line::styled("Loading...", style.placeholder))
                    .alignment(Alignment::Center)
                    .render(centered_row(inner), buf);
            }
            Self::Image { image, .. } => {
                let caption_area = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
                let image_area = Rect::new(
                    inner.x,
                    inner.y,
                    inner.width,
                    inner.height.saturating_sub(1),
                );
                HalfBlockImage::new(&image.image).render(image_area, buf);

                let caption = format!(
                    "{}x{} from {} ({})",
                    image.width(),
                    image.height(),
                    image.source,
                    image.id
                );
                Paragraph::new(Line::styled(caption, style.caption))
                    .alignment(Alignment::Center)
                    .render(caption_area, buf);
            }
            Self::Error { reason, .. } => {
                let mut lines = vec![Line::styled("Image unavailable", style.error)];
                match reason {
                    Some(e) => lines.push(Line::from(Span::styled(e.to_string(), style.caption))),
                    None => lines.push(Line::styled("No URL given", style.caption)),
                }
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(centered_row(inner), buf);
            }
        }
    }
}

fn centered_row(area: Rect) -> Rect {
    let y = area.y + area.height.saturating_sub(1) / 2;
    Rect::new(area.x, y, area.width, area.bottom().saturating_sub(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::entities::{ImageId, ImageSource};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test]
    fn test_placeholder_renders_loading_text() {
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);

        ImagePreview::Placeholder { title: "img" }.render(area, &mut buf);

        assert!(buffer_text(&buf).contains("Loading..."));
    }

    #[test]
    fn test_error_renders_reason() {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        let reason = FetchError::status(404);

        ImagePreview::Error {
            title: "img",
            reason: Some(&reason),
        }
        .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Image unavailable"));
        assert!(text.contains("404"));
    }

    #[test]
    fn test_half_block_paints_pixel_colors() {
        let mut img = image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        let img = image::DynamicImage::ImageRgb8(img);

        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        HalfBlockImage::new(&img).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_image_renders_caption() {
        let loaded = LoadedImage::new(
            ImageId::new("cat.png"),
            Arc::new(image::DynamicImage::new_rgb8(4, 4)),
            ImageSource::DiskCache,
        );
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);

        ImagePreview::Image {
            title: "img",
            image: &loaded,
        }
        .render(area, &mut buf);

        assert!(buffer_text(&buf).contains("4x4 from disk (cat.png)"));
    }

    #[test]
    fn test_zero_area_is_noop() {
        let img = image::DynamicImage::new_rgb8(4, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        HalfBlockImage::new(&img).render(Rect::new(0, 0, 0, 0), &mut buf);
    }
}
