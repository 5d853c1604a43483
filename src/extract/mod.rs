//! Text extraction: joins page text into one readable blob and strips the
//! publisher footer.

mod footer;
mod pipeline;

pub use footer::{remove_ranges, FooterPattern, DEFAULT_FOOTER_PATTERN};
pub use pipeline::{
    ExtractOptions, ExtractedText, PageText, TextExtractionPipeline, TextSource, FIRST_TEXT_PAGE,
    PAGE_SPACER,
};
