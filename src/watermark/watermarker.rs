//! The "SAMPLE CHAPTER" page caption.

use crate::model::{Point, Rect, Size};

use super::canvas::{Canvas, Rgb, SavedState, TextAttributes};
use super::metrics::HELVETICA_BOLD;

/// Caption drawn on every page.
pub const CAPTION: &str = "SAMPLE CHAPTER";

/// Caption font size in points.
pub const CAPTION_FONT_SIZE: f32 = 32.0;

/// Offset of the caption from the flipped origin.
pub const CAPTION_OFFSET: f32 = 55.0;

/// Decoration drawn over a page after its own content.
///
/// `bounds` is the page box for the configured display box, `None` when
/// the page has none; decorators are expected to draw nothing then.
pub trait PageDecorator: Send + Sync {
    fn decorate(&self, bounds: Option<Rect>, canvas: &mut dyn Canvas);
}

impl<F> PageDecorator for F
where
    F: Fn(Option<Rect>, &mut dyn Canvas) + Send + Sync,
{
    fn decorate(&self, bounds: Option<Rect>, canvas: &mut dyn Canvas) {
        self(bounds, canvas)
    }
}

/// Draws a red, bold, horizontally centered caption on each page.
#[derive(Debug, Clone)]
pub struct Watermarker {
    attributes: TextAttributes,
}

impl Watermarker {
    pub fn new() -> Self {
        Self {
            attributes: TextAttributes {
                font: &HELVETICA_BOLD,
                size: CAPTION_FONT_SIZE,
                color: Rgb::RED,
            },
        }
    }

    pub fn attributes(&self) -> &TextAttributes {
        &self.attributes
    }

    /// Where the drawing origin moves before the axis flip: centered
    /// horizontally, at the top edge vertically.
    pub fn caption_origin(bounds: Rect, caption: Size) -> Point {
        Point::new(
            bounds.x + (bounds.width - caption.width) / 2.0,
            bounds.y + bounds.height,
        )
    }
}

impl Default for Watermarker {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDecorator for Watermarker {
    fn decorate(&self, bounds: Option<Rect>, canvas: &mut dyn Canvas) {
        let Some(caption) = canvas.text_size(CAPTION, &self.attributes) else {
            log::debug!("caption metrics unavailable, watermark skipped");
            return;
        };
        let Some(bounds) = bounds else {
            log::debug!("page bounds unavailable, watermark skipped");
            return;
        };

        let origin = Self::caption_origin(bounds, caption);
        let mut canvas = SavedState::new(canvas);
        canvas.translate(origin.x, origin.y);
        canvas.scale(1.0, -1.0);
        canvas.draw_text(CAPTION, Point::new(0.0, CAPTION_OFFSET), &self.attributes);
    }
}
