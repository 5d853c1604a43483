//! Error types for pdfsampler.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsampler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, decorating or querying a book.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// A footer pattern failed to compile.
    #[error("Invalid footer pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An operation needed an open document but none is loaded.
    #[error("No document is loaded")]
    NoDocument,

    /// Sharing was requested while nothing is selected.
    #[error("Please select some text to share.")]
    NoSelection,

    /// Error while writing page decorations or saving the PDF.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
