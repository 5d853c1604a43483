//! # pdfsampler
//!
//! Sample-chapter reader for a library of PDF books.
//!
//! Books are opened by title from a [`Library`] directory. Every page can be
//! rendered with a red "SAMPLE CHAPTER" caption, and the readable text of a
//! book is extracted with the publisher footers stripped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsampler::{Library, Session};
//!
//! fn main() -> pdfsampler::Result<()> {
//!     let mut session = Session::new(Library::new("books"));
//!     if session.load("Pro Swift") {
//!         if let Some(text) = session.text() {
//!             println!("{}", text.as_str());
//!         }
//!         session.render_to("pro-swift-sample.pdf")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Watermarking**: a centered caption drawn over every page through the
//!   [`PageDecorator`] strategy
//! - **Text extraction**: pages joined after the cover, footers removed,
//!   font styles kept
//! - **Reading session**: navigation, case-insensitive search, selection
//!   and sharing

pub mod error;
pub mod extract;
pub mod library;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;
pub mod watermark;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, ExtractedText, FooterPattern, TextExtractionPipeline, TextSource,
    DEFAULT_FOOTER_PATTERN,
};
pub use library::{resource_name, Library, BUNDLED_BOOKS};
pub use model::{DisplayBox, Document, Metadata, Page, Rect, StyledText, TextStyle};
pub use parser::{DocumentLoader, ErrorMode, LoadOptions, LoadedDocument};
pub use render::{decorate_document, JsonFormat};
pub use session::{Selection, Session, ViewMode};
pub use watermark::{Canvas, PageDecorator, Watermarker, CAPTION};

use std::path::Path;

/// Open a PDF book.
///
/// Pages whose text cannot be read are kept without text; use
/// [`DocumentLoader`] with strict options to fail on them instead.
///
/// # Example
///
/// ```no_run
/// let book = pdfsampler::open("books/pro-swift.pdf").unwrap();
/// println!("Pages: {}", book.document.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<LoadedDocument> {
    DocumentLoader::open_with_options(path, LoadOptions::new().lenient())?.load()
}

/// Extract the readable text of a PDF book with the default footer pattern.
///
/// # Example
///
/// ```no_run
/// let text = pdfsampler::extract_text("books/pro-swift.pdf").unwrap();
/// println!("{}", text.as_str());
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<ExtractedText> {
    extract_text_with_options(path, ExtractOptions::default())
}

/// Extract the readable text of a PDF book with custom options.
pub fn extract_text_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractedText> {
    let book = open(path)?;
    TextExtractionPipeline::new(options)
        .run(&book.document)
        .ok_or_else(|| Error::TextExtract("page count unavailable".to_string()))
}

/// Write a copy of a PDF with the "SAMPLE CHAPTER" caption on every page.
///
/// Returns the number of pages decorated.
///
/// # Example
///
/// ```no_run
/// let pages = pdfsampler::watermark_file("book.pdf", "sample.pdf").unwrap();
/// println!("Watermarked {} pages", pages);
/// ```
pub fn watermark_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
    watermark_file_with_options(input, output, DisplayBox::default())
}

/// Watermark a PDF, laying the caption out against the given page box.
pub fn watermark_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    display_box: DisplayBox,
) -> Result<usize> {
    let mut book = open(input)?;
    let pages = decorate_document(&mut book.pdf, &Watermarker::new(), display_box)?;
    let mut file = std::fs::File::create(output)?;
    book.pdf.save_to(&mut file)?;
    Ok(pages)
}
