//! Publisher footer pattern and range removal.

use std::ops::Range;

use regex::Regex;

use crate::error::Result;
use crate::model::StyledText;

/// Footer stamped on every page of the bundled books: the publisher URL
/// followed by a one or two digit page number.
pub const DEFAULT_FOOTER_PATTERN: &str = "www.hackingwithswift.com [0-9]{1,2}";

/// A compiled footer pattern.
#[derive(Debug, Clone)]
pub struct FooterPattern {
    regex: Regex,
}

impl FooterPattern {
    /// Compile a custom pattern (regex syntax, case-sensitive).
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Non-overlapping matches over the whole text, in ascending order.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Default for FooterPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_FOOTER_PATTERN).expect("default footer pattern is valid"),
        }
    }
}

/// Remove ascending, non-overlapping byte ranges from a styled text.
///
/// Ranges are removed last-to-first so every offset still to be
/// processed refers to the text as it was when the ranges were found.
pub fn remove_ranges(text: &mut StyledText, ranges: &[Range<usize>]) {
    for range in ranges.iter().rev() {
        text.remove_range(range.clone());
    }
}
