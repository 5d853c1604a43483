//! Styled text: a plain string plus style spans over byte ranges.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Character styling carried by a span of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Base font name (e.g. "Helvetica-Bold")
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,
}

impl TextStyle {
    /// Derive a style from a base font name and size.
    ///
    /// Weight and slant are read from the usual name suffixes
    /// (`-Bold`, `-BoldItalic`, `-Oblique`, ...).
    pub fn from_font(base_font: &str, size: f32) -> Self {
        // Subset fonts carry a six letter tag: ABCDEF+Helvetica-Bold
        let name = base_font
            .split_once('+')
            .map(|(_, rest)| rest)
            .unwrap_or(base_font);
        let lower = name.to_ascii_lowercase();
        Self {
            font_name: Some(name.to_string()),
            font_size: Some(size),
            bold: lower.contains("bold") || lower.contains("black") || lower.contains("heavy"),
            italic: lower.contains("italic") || lower.contains("oblique"),
        }
    }
}

/// A style applied to a byte range of a [`StyledText`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpan {
    pub range: Range<usize>,
    pub style: TextStyle,
}

/// Text with non-overlapping style spans, ordered by position.
///
/// Bytes not covered by any span are unstyled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyledText {
    text: String,
    spans: Vec<StyleSpan>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Text carrying a single style over its whole length.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let mut styled = Self::new();
        styled.push_styled(&text.into(), style);
        styled
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn spans(&self) -> &[StyleSpan] {
        &self.spans
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.text.ends_with(suffix)
    }

    /// Style at a byte offset, if any span covers it.
    pub fn style_at(&self, offset: usize) -> Option<&TextStyle> {
        self.spans
            .iter()
            .find(|span| span.range.contains(&offset))
            .map(|span| &span.style)
    }

    /// Append unstyled text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append text with a style, merging with the previous span when it
    /// ends right here and has the same style.
    pub fn push_styled(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();

        if let Some(last) = self.spans.last_mut() {
            if last.range.end == start && last.style == style {
                last.range.end = end;
                return;
            }
        }
        self.spans.push(StyleSpan {
            range: start..end,
            style,
        });
    }

    /// Append another styled text, shifting its spans.
    pub fn append(&mut self, other: &StyledText) {
        let offset = self.text.len();
        let mut cursor = 0;
        for span in &other.spans {
            if span.range.start > cursor {
                self.push_str(&other.text[cursor..span.range.start]);
            }
            self.push_styled(&other.text[span.range.clone()], span.style.clone());
            cursor = span.range.end;
        }
        if cursor < other.text.len() {
            self.push_str(&other.text[cursor..]);
        }
        debug_assert_eq!(self.text.len(), offset + other.text.len());
    }

    /// Remove a byte range, keeping spans consistent.
    ///
    /// Spans after the range shift left, spans overlapping it shrink and
    /// spans that become empty are dropped. Offsets past `range.end` are
    /// invalidated by this call; earlier offsets are not.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or does not lie on char
    /// boundaries, like [`String::replace_range`].
    pub fn remove_range(&mut self, range: Range<usize>) {
        let Range { start, end } = range;
        self.text.replace_range(start..end, "");
        let removed = end - start;

        let shift = |offset: usize| -> usize {
            if offset <= start {
                offset
            } else if offset <= end {
                start
            } else {
                offset - removed
            }
        };

        for span in &mut self.spans {
            span.range = shift(span.range.start)..shift(span.range.end);
        }
        self.spans.retain(|span| !span.range.is_empty());
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

impl std::fmt::Display for StyledText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> TextStyle {
        TextStyle::from_font("Helvetica-Bold", 12.0)
    }

    #[test]
    fn test_style_from_font_name() {
        let style = TextStyle::from_font("ABCDEF+Times-BoldItalic", 10.0);
        assert_eq!(style.font_name.as_deref(), Some("Times-BoldItalic"));
        assert!(style.bold);
        assert!(style.italic);

        let regular = TextStyle::from_font("Courier", 10.0);
        assert!(!regular.bold);
        assert!(!regular.italic);
    }

    #[test]
    fn test_push_styled_merges_adjacent_spans() {
        let mut text = StyledText::new();
        text.push_styled("Hello", bold());
        text.push_styled(", world", bold());
        assert_eq!(text.spans().len(), 1);
        assert_eq!(text.spans()[0].range, 0..12);
    }

    #[test]
    fn test_append_shifts_spans() {
        let mut text = StyledText::plain("\n\n");
        let mut page = StyledText::plain("intro ");
        page.push_styled("Title", bold());
        text.append(&page);

        assert_eq!(text.as_str(), "\n\nintro Title");
        assert_eq!(text.spans()[0].range, 8..13);
        assert!(text.style_at(9).unwrap().bold);
        assert!(text.style_at(3).is_none());
    }

    #[test]
    fn test_remove_range_before_span_shifts_it() {
        let mut text = StyledText::plain("0123456789");
        text.push_styled("BOLD", bold());
        text.remove_range(2..5);
        assert_eq!(text.as_str(), "0156789BOLD");
        assert_eq!(text.spans()[0].range, 7..11);
    }

    #[test]
    fn test_remove_range_inside_span_shrinks_it() {
        let mut text = StyledText::styled("abcdefgh", bold());
        text.remove_range(2..4);
        assert_eq!(text.as_str(), "abefgh");
        assert_eq!(text.spans()[0].range, 0..6);
    }

    #[test]
    fn test_remove_range_overlapping_span_edges() {
        let mut text = StyledText::plain("xxxx");
        text.push_styled("BOLD", bold());
        text.push_str("yyyy");
        // Remove "xxBO"
        text.remove_range(2..6);
        assert_eq!(text.as_str(), "xxLDyyyy");
        assert_eq!(text.spans()[0].range, 2..4);
    }

    #[test]
    fn test_remove_range_drops_covered_span() {
        let mut text = StyledText::plain("keep ");
        text.push_styled("gone", bold());
        text.push_str(" keep");
        text.remove_range(5..9);
        assert_eq!(text.as_str(), "keep  keep");
        assert!(text.spans().is_empty());
    }
}
