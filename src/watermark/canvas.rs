//! Drawing surface abstraction for page decorations.

use std::ops::{Deref, DerefMut};

use crate::model::{Point, Size};

use super::metrics::FontMetrics;

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Font, size and color of drawn text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAttributes {
    pub font: &'static FontMetrics,
    pub size: f32,
    pub color: Rgb,
}

/// A surface that decorations draw on.
///
/// Coordinates follow the current transformation, which starts as the
/// page's own bottom-up user space. `draw_text` places the top-left corner
/// of the text box at the given point, with glyphs upright in a y-down
/// space (after a `scale(1, -1)`).
pub trait Canvas {
    /// Push a copy of the graphics state.
    fn save_state(&mut self);

    /// Pop the graphics state pushed by the matching `save_state`.
    fn restore_state(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    fn draw_text(&mut self, text: &str, at: Point, attributes: &TextAttributes);

    /// Rendered size of a line of text, `None` when metrics are unknown.
    fn text_size(&self, text: &str, attributes: &TextAttributes) -> Option<Size> {
        attributes.font.text_size(text, attributes.size)
    }
}

/// Saves the canvas state on creation and restores it on drop.
pub struct SavedState<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> SavedState<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        canvas.save_state();
        Self { canvas }
    }
}

impl<C: Canvas + ?Sized> Deref for SavedState<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for SavedState<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for SavedState<'_, C> {
    fn drop(&mut self) {
        self.canvas.restore_state();
    }
}
