//! Glyph metrics for the standard 14 fonts used by page decorations.

use crate::model::Size;

/// Advance widths (1/1000 em) and vertical metrics of a standard font.
#[derive(Debug, PartialEq)]
pub struct FontMetrics {
    /// PostScript name written into the font dictionary
    pub base_font: &'static str,
    /// Name under which the font is registered in page resources
    pub resource_name: &'static str,
    /// Widths for WinAnsi codes 32..=126
    widths: [u16; 95],
    ascender: i16,
    descender: i16,
}

/// Helvetica-Bold, from the Adobe Core 14 AFM.
pub static HELVETICA_BOLD: FontMetrics = FontMetrics {
    base_font: "Helvetica-Bold",
    resource_name: "SampleCaptionBold",
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
    ],
    ascender: 718,
    descender: -207,
};

impl FontMetrics {
    /// Advance width of one character in 1/1000 em, `None` outside the table.
    pub fn char_width(&self, c: char) -> Option<u16> {
        let code = c as u32;
        if !(32..=126).contains(&code) {
            return None;
        }
        Some(self.widths[(code - 32) as usize])
    }

    /// Width of a string at a font size, `None` if any glyph is unknown.
    pub fn string_width(&self, text: &str, size: f32) -> Option<f32> {
        let units = text
            .chars()
            .map(|c| self.char_width(c).map(u32::from))
            .sum::<Option<u32>>()?;
        Some(units as f32 * size / 1000.0)
    }

    /// Distance from baseline to the top of the tallest glyphs.
    pub fn ascent(&self, size: f32) -> f32 {
        self.ascender as f32 * size / 1000.0
    }

    /// Ascender to descender height.
    pub fn line_height(&self, size: f32) -> f32 {
        (self.ascender - self.descender) as f32 * size / 1000.0
    }

    /// Rendered size of a single line of text.
    pub fn text_size(&self, text: &str, size: f32) -> Option<Size> {
        Some(Size::new(
            self.string_width(text, size)?,
            self.line_height(size),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_widths() {
        assert_eq!(HELVETICA_BOLD.char_width(' '), Some(278));
        assert_eq!(HELVETICA_BOLD.char_width('W'), Some(944));
        assert_eq!(HELVETICA_BOLD.char_width('~'), Some(584));
        assert_eq!(HELVETICA_BOLD.char_width('é'), None);
    }

    #[test]
    fn test_caption_width() {
        let width = HELVETICA_BOLD.string_width("SAMPLE CHAPTER", 32.0).unwrap();
        assert!((width - 296.896).abs() < 1e-3);
    }

    #[test]
    fn test_unknown_glyph_has_no_width() {
        assert!(HELVETICA_BOLD.string_width("Café", 12.0).is_none());
        assert_eq!(HELVETICA_BOLD.string_width("", 12.0), Some(0.0));
    }

    #[test]
    fn test_vertical_metrics() {
        assert!((HELVETICA_BOLD.ascent(32.0) - 22.976).abs() < 1e-3);
        assert!((HELVETICA_BOLD.line_height(32.0) - 29.6).abs() < 1e-3);
    }
}
