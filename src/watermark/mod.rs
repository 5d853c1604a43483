//! Page decorations: the drawing surface abstraction, glyph metrics and
//! the "SAMPLE CHAPTER" watermark.

mod canvas;
mod content;
mod metrics;
mod watermarker;

pub use canvas::{Canvas, Rgb, SavedState, TextAttributes};
pub use content::ContentCanvas;
pub use metrics::{FontMetrics, HELVETICA_BOLD};
pub use watermarker::{
    PageDecorator, Watermarker, CAPTION, CAPTION_FONT_SIZE, CAPTION_OFFSET,
};
