//! Builds the readable text of a book from its pages.

use serde::Serialize;

use crate::error::Result;
use crate::model::{Document, Page, StyledText};

use super::footer::{remove_ranges, FooterPattern};

/// Inserted before every included page.
pub const PAGE_SPACER: &str = "\n\n";

/// Index of the first page that contributes text; the cover is skipped.
pub const FIRST_TEXT_PAGE: usize = 1;

/// A page that may expose styled text.
pub trait PageText {
    fn styled_text(&self) -> Option<&StyledText>;
}

/// A document the pipeline can read pages from.
pub trait TextSource {
    type Page: PageText + ?Sized;

    /// Number of pages, `None` when it cannot be determined.
    fn page_count(&self) -> Option<usize>;

    /// Page at a 0-based index, `None` when it is missing.
    fn page(&self, index: usize) -> Option<&Self::Page>;
}

impl PageText for Page {
    fn styled_text(&self) -> Option<&StyledText> {
        self.text()
    }
}

impl TextSource for Document {
    type Page = Page;

    fn page_count(&self) -> Option<usize> {
        Some(self.pages.len())
    }

    fn page(&self, index: usize) -> Option<&Page> {
        Document::page(self, index)
    }
}

/// Options for text extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Pattern removed from the joined text
    pub footer: FooterPattern,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the footer pattern.
    pub fn with_footer(mut self, footer: FooterPattern) -> Self {
        self.footer = footer;
        self
    }

    /// Compile and use a custom footer pattern.
    pub fn with_footer_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_footer(FooterPattern::new(pattern)?))
    }
}

/// Cleaned, joined text of a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedText {
    /// The joined text with footers removed
    pub text: StyledText,

    /// Pages whose text was appended
    pub pages_included: usize,

    /// Indices skipped because the page was missing
    pub missing_pages: Vec<usize>,

    /// Indices skipped because the page had no text
    pub pages_without_text: Vec<usize>,

    /// Number of footer matches removed
    pub footers_removed: usize,
}

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Joins page text (skipping the first page) and strips footers.
#[derive(Debug, Clone, Default)]
pub struct TextExtractionPipeline {
    options: ExtractOptions,
}

impl TextExtractionPipeline {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the pipeline.
    ///
    /// Returns `None` when the source cannot report a page count, so the
    /// caller can keep whatever text it had. Sources with zero or one page
    /// give an empty result.
    pub fn run<S: TextSource + ?Sized>(&self, source: &S) -> Option<ExtractedText> {
        let Some(page_count) = source.page_count() else {
            log::debug!("page count unavailable, skipping text extraction");
            return None;
        };

        let mut result = ExtractedText::default();

        for index in FIRST_TEXT_PAGE..page_count {
            let Some(page) = source.page(index) else {
                log::debug!("page {} missing, skipped", index);
                result.missing_pages.push(index);
                continue;
            };
            let Some(content) = page.styled_text() else {
                log::debug!("page {} has no text, skipped", index);
                result.pages_without_text.push(index);
                continue;
            };

            result.text.push_str(PAGE_SPACER);
            result.text.append(content);
            result.pages_included += 1;
        }

        let matches = self.options.footer.find_all(result.text.as_str());
        remove_ranges(&mut result.text, &matches);
        result.footers_removed = matches.len();

        log::debug!(
            "extracted {} pages, removed {} footers",
            result.pages_included,
            result.footers_removed
        );
        Some(result)
    }
}
