//! A canvas that records PDF content stream operations.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use crate::error::{Error, Result};
use crate::model::Point;

use super::canvas::{Canvas, TextAttributes};
use super::metrics::FontMetrics;

/// Records drawing calls as content stream operators, ready to be appended
/// to a page.
#[derive(Debug, Default)]
pub struct ContentCanvas {
    operations: Vec<Operation>,
    fonts: Vec<&'static FontMetrics>,
    depth: usize,
}

impl ContentCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Fonts referenced by drawn text; each must be registered in the page
    /// resources under its `resource_name`.
    pub fn fonts(&self) -> &[&'static FontMetrics] {
        &self.fonts
    }

    /// Encode the recorded operations.
    ///
    /// Fails if a `save_state` was left without its `restore_state`.
    pub fn encode(self) -> Result<Vec<u8>> {
        if self.depth != 0 {
            return Err(Error::Render(format!(
                "{} graphics state(s) left unrestored",
                self.depth
            )));
        }
        Content {
            operations: self.operations,
        }
        .encode()
        .map_err(|e| Error::Render(e.to_string()))
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }
}

impl Canvas for ContentCanvas {
    fn save_state(&mut self) {
        self.depth += 1;
        self.push("q", vec![]);
    }

    fn restore_state(&mut self) {
        if self.depth == 0 {
            log::warn!("restore_state without matching save_state ignored");
            return;
        }
        self.depth -= 1;
        self.push("Q", vec![]);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.push(
            "cm",
            vec![real(1.0), real(0.0), real(0.0), real(1.0), real(dx), real(dy)],
        );
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.push(
            "cm",
            vec![real(sx), real(0.0), real(0.0), real(sy), real(0.0), real(0.0)],
        );
    }

    fn draw_text(&mut self, text: &str, at: Point, attributes: &TextAttributes) {
        let font = attributes.font;
        if !self.fonts.iter().any(|f| std::ptr::eq(*f, font)) {
            self.fonts.push(font);
        }

        let color = attributes.color;
        // Baseline sits one ascent below the requested top edge; the text
        // matrix flips glyphs back upright.
        let baseline = at.y + font.ascent(attributes.size);
        self.push("rg", vec![real(color.r), real(color.g), real(color.b)]);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![
                Object::Name(font.resource_name.as_bytes().to_vec()),
                real(attributes.size),
            ],
        );
        self.push(
            "Tm",
            vec![
                real(1.0),
                real(0.0),
                real(0.0),
                real(-1.0),
                real(at.x),
                real(baseline),
            ],
        );
        self.push(
            "Tj",
            vec![Object::String(win_ansi_bytes(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Latin-1 bytes of a string; characters outside it become `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watermark::canvas::{Rgb, SavedState};
    use crate::watermark::metrics::HELVETICA_BOLD;

    fn operators(canvas: &ContentCanvas) -> Vec<&str> {
        canvas
            .operations()
            .iter()
            .map(|op| op.operator.as_str())
            .collect()
    }

    #[test]
    fn test_saved_state_guard_balances() {
        let mut canvas = ContentCanvas::new();
        {
            let mut saved = SavedState::new(&mut canvas);
            saved.translate(10.0, 20.0);
        }
        assert_eq!(operators(&canvas), vec!["q", "cm", "Q"]);
        assert!(canvas.encode().is_ok());
    }

    #[test]
    fn test_unbalanced_state_fails_to_encode() {
        let mut canvas = ContentCanvas::new();
        canvas.save_state();
        assert!(matches!(canvas.encode(), Err(Error::Render(_))));

        let mut canvas = ContentCanvas::new();
        canvas.restore_state();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_draw_text_records_font_and_operators() {
        let attributes = TextAttributes {
            font: &HELVETICA_BOLD,
            size: 32.0,
            color: Rgb::RED,
        };
        let mut canvas = ContentCanvas::new();
        canvas.draw_text("Hi", Point::new(0.0, 55.0), &attributes);
        canvas.draw_text("again", Point::new(0.0, 90.0), &attributes);

        assert_eq!(canvas.fonts().len(), 1);
        assert_eq!(
            &operators(&canvas)[..6],
            &["rg", "BT", "Tf", "Tm", "Tj", "ET"]
        );

        let encoded = String::from_utf8(canvas.encode().unwrap()).unwrap();
        assert!(encoded.contains("/SampleCaptionBold"));
        assert!(encoded.contains("(Hi) Tj"));
    }

    #[test]
    fn test_win_ansi_bytes() {
        assert_eq!(win_ansi_bytes("é€"), vec![0xE9, b'?']);
    }
}
