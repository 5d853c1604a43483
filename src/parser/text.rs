//! Content stream walker that turns text-showing operators into styled text.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{StyledText, TextStyle};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// TJ adjustments beyond this (in 1/1000 text space units) read as a word gap.
const SPACE_THRESHOLD: f32 = 200.0;

/// Baseline differences below this are treated as the same line.
const LINE_TOLERANCE: f32 = 0.5;

/// Average glyph advance as a fraction of the font size, used to estimate
/// where a run of text ends.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// A horizontal gap wider than this fraction of the average glyph advance
/// separates two runs on the same line with a space.
const WORD_GAP: f32 = 0.5;

const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Text state tracked while walking a content stream.
struct TextState {
    font_resource: Vec<u8>,
    style: TextStyle,
    font_size: f32,
    leading: f32,
    /// Start of the current text line.
    line_x: f32,
    line_y: f32,
    /// Where the next glyph will be placed on the current line.
    pen_x: f32,
    /// Baseline and estimated end of the last shown run.
    printed: Option<(f32, f32)>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            style: TextStyle::default(),
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_FONT_SIZE,
            line_x: 0.0,
            line_y: 0.0,
            pen_x: 0.0,
            printed: None,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.set_line(self.line_x + tx, self.line_y + ty);
    }

    fn set_line(&mut self, x: f32, y: f32) {
        self.line_x = x;
        self.line_y = y;
        self.pen_x = x;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn char_width(&self) -> f32 {
        self.font_size * AVG_CHAR_WIDTH
    }
}

/// Extract the styled text of one page.
pub fn extract_styled_text<B: PdfBackend>(backend: &B, page: PageId) -> Result<StyledText> {
    let fonts: HashMap<Vec<u8>, String> = backend
        .page_fonts(page)?
        .into_iter()
        .map(|font| (font.name, font.base_font))
        .collect();

    let content = backend.page_content(page)?;
    let ops = backend.decode_content(&content)?;

    let mut out = StyledText::new();
    let mut state = TextState::default();

    for op in &ops {
        match op.operator.as_str() {
            "BT" => state.set_line(0.0, 0.0),
            "Tf" => set_font(&mut state, op, &fonts),
            "TL" => {
                if let Some(leading) = number(op, 0) {
                    state.leading = leading;
                }
            }
            "Td" => {
                state.move_line(number(op, 0).unwrap_or(0.0), number(op, 1).unwrap_or(0.0));
            }
            "TD" => {
                let ty = number(op, 1).unwrap_or(0.0);
                state.leading = -ty;
                state.move_line(number(op, 0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let (Some(e), Some(f)) = (number(op, 4), number(op, 5)) {
                    state.set_line(e, f);
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = backend.decode_text(page, &state.font_resource, bytes);
                    show(&mut out, &mut state, &text, 0.0);
                }
            }
            "'" => {
                state.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = backend.decode_text(page, &state.font_resource, bytes);
                    show(&mut out, &mut state, &text, 0.0);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let text = backend.decode_text(page, &state.font_resource, bytes);
                    show(&mut out, &mut state, &text, 0.0);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let (text, kerning) =
                        combine_tj(backend, page, &state.font_resource, items);
                    let shift = kerning / 1000.0 * state.font_size;
                    show(&mut out, &mut state, &text, shift);
                }
            }
            _ => {}
        }
    }

    Ok(out)
}

fn number(op: &ContentOp, index: usize) -> Option<f32> {
    op.operands.get(index).and_then(PdfValue::as_number)
}

fn set_font(state: &mut TextState, op: &ContentOp, fonts: &HashMap<Vec<u8>, String>) {
    let Some(PdfValue::Name(resource)) = op.operands.first() else {
        return;
    };
    let size = number(op, 1).unwrap_or(DEFAULT_FONT_SIZE).abs();
    let base_font = fonts
        .get(resource)
        .cloned()
        .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string());
    state.font_resource = resource.clone();
    state.font_size = size;
    state.style = TextStyle::from_font(&base_font, size);
}

/// Append shown text, breaking the line when the baseline moved and
/// inserting a space when the run starts past the end of the previous one.
///
/// `shift` is the extra advance from TJ kerning, in user space.
fn show(out: &mut StyledText, state: &mut TextState, text: &str, shift: f32) {
    if text.is_empty() {
        return;
    }
    if let Some((prev_y, prev_end)) = state.printed {
        if (prev_y - state.line_y).abs() > LINE_TOLERANCE {
            if !out.ends_with("\n") {
                out.push_str("\n");
            }
        } else if state.pen_x - prev_end > state.char_width() * WORD_GAP
            && !out.as_str().ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
        {
            out.push_str(" ");
        }
    }
    out.push_styled(text, state.style.clone());
    state.pen_x += text.chars().count() as f32 * state.char_width() + shift;
    state.printed = Some((state.line_y, state.pen_x));
}

/// Join the strings of a TJ array, turning wide negative kerning into spaces.
///
/// Also returns the summed kerning advance in thousandths of an em.
fn combine_tj<B: PdfBackend>(
    backend: &B,
    page: PageId,
    font_resource: &[u8],
    items: &[PdfValue],
) -> (String, f32) {
    let mut combined = String::new();
    let mut kerning = 0.0;
    for item in items {
        match item {
            PdfValue::Str(bytes) => {
                combined.push_str(&backend.decode_text(page, font_resource, bytes));
            }
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let adjustment = -item.as_number().unwrap_or(0.0);
                kerning += adjustment;
                if adjustment > SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    (combined, kerning)
}
