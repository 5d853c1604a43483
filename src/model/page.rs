//! Page-level types.

use super::{DisplayBox, Rect, StyledText};
use serde::{Deserialize, Serialize};

/// A single page of an opened book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,

    /// Media box in points
    pub media_box: Rect,

    /// Crop box in points, when the page declares one
    pub crop_box: Option<Rect>,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,

    /// Extracted text, `None` when the page has no readable text
    pub text: Option<StyledText>,
}

impl Page {
    /// Create a page with the given media box size and no text.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            media_box: Rect::new(0.0, 0.0, width, height),
            crop_box: None,
            rotation: 0,
            text: None,
        }
    }

    /// Create a US Letter page (8.5 x 11 inches).
    pub fn letter(index: usize) -> Self {
        Self::new(index, 612.0, 792.0)
    }

    /// Set the page text.
    pub fn with_text(mut self, text: impl Into<StyledText>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the crop box.
    pub fn with_crop_box(mut self, crop_box: Rect) -> Self {
        self.crop_box = Some(crop_box);
        self
    }

    /// Page bounds for a display box.
    ///
    /// The crop box is clipped to the media box; a missing or disjoint
    /// crop box falls back to the media box.
    pub fn bounds(&self, display_box: DisplayBox) -> Rect {
        match display_box {
            DisplayBox::MediaBox => self.media_box,
            DisplayBox::CropBox => self
                .crop_box
                .and_then(|crop| crop.intersection(&self.media_box))
                .unwrap_or(self.media_box),
        }
    }

    /// The page text, if any.
    pub fn text(&self) -> Option<&StyledText> {
        self.text.as_ref()
    }

    /// Plain text of the page, empty when there is none.
    pub fn plain_text(&self) -> &str {
        self.text.as_ref().map(StyledText::as_str).unwrap_or("")
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        let bounds = self.media_box;
        if self.rotation % 180 == 90 {
            bounds.height > bounds.width
        } else {
            bounds.width > bounds.height
        }
    }
}
