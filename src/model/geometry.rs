//! Points, sizes and page boxes in PDF user space (1 unit = 1/72 inch).

use serde::{Deserialize, Serialize};

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle with its origin at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from a PDF box array `[llx lly urx ury]`.
    ///
    /// The corners may come in any order; they are normalized.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (bottom, top) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self::new(left, bottom, right - left, top - bottom)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap of two rectangles, or `None` when they do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let bottom = self.y.max(other.y);
        let right = self.max_x().min(other.max_x());
        let top = self.max_y().min(other.max_y());
        if right <= left || top <= bottom {
            return None;
        }
        Some(Rect::from_corners(left, bottom, right, top))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Which page box to use when laying out a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayBox {
    /// The full physical medium.
    MediaBox,
    /// The visible region; falls back to the media box when absent.
    #[default]
    CropBox,
}

impl DisplayBox {
    /// The page dictionary key for this box.
    pub fn key(&self) -> &'static [u8] {
        match self {
            DisplayBox::MediaBox => b"MediaBox",
            DisplayBox::CropBox => b"CropBox",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let rect = Rect::from_corners(612.0, 792.0, 0.0, 0.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn test_intersection() {
        let media = Rect::new(0.0, 0.0, 612.0, 792.0);
        let crop = Rect::new(36.0, 36.0, 1000.0, 1000.0);
        let clipped = media.intersection(&crop).unwrap();
        assert_eq!(clipped, Rect::new(36.0, 36.0, 576.0, 756.0));

        let outside = Rect::new(700.0, 0.0, 10.0, 10.0);
        assert!(media.intersection(&outside).is_none());
    }
}
