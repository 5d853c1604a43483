//! Opens a PDF book into the document model.

use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Page, Rect};

use super::backend::{LopdfBackend, PdfBackend};
use super::options::{ErrorMode, LoadOptions};
use super::text::extract_styled_text;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Fallback page size (US Letter) when a page has no usable media box.
const LETTER: Rect = Rect::new(0.0, 0.0, 612.0, 792.0);

/// An opened book: the model plus the PDF it was read from.
///
/// The PDF is kept so pages can later be rendered with decorations.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub pdf: LopdfDocument,
}

/// Loads PDF books into [`LoadedDocument`]s.
pub struct DocumentLoader {
    backend: LopdfBackend,
    options: LoadOptions,
}

impl DocumentLoader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, LoadOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: LoadOptions) -> Result<Self> {
        check_header(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        if backend.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { backend, options })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.backend.pages().len()
    }

    /// Read metadata and every page, then hand back the model with its PDF.
    pub fn load(self) -> Result<LoadedDocument> {
        let mut document = Document::new();
        document.metadata = self.extract_metadata();

        for (page_num, page_id) in self.backend.pages() {
            let index = page_num.saturating_sub(1) as usize;
            let media_box = self
                .backend
                .page_box(page_id, crate::model::DisplayBox::MediaBox)
                .unwrap_or_else(|| {
                    log::debug!("page {} has no media box, assuming Letter", index);
                    LETTER
                });
            let crop_box = self
                .backend
                .page_box(page_id, crate::model::DisplayBox::CropBox)
                .filter(|crop| *crop != media_box);

            let text = match extract_styled_text(&self.backend, page_id) {
                // A page that shows only whitespace still has text.
                Ok(text) if !text.as_str().is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::TextExtract(format!("page {}: {}", index, e)));
                    }
                    log::warn!("Failed to extract text from page {}: {}", index, e);
                    None
                }
            };

            document.add_page(Page {
                index,
                media_box,
                crop_box,
                rotation: self.backend.page_rotation(page_id),
                text,
            });
        }
        document.metadata.page_count = document.page_count();

        Ok(LoadedDocument {
            document,
            pdf: self.backend.into_inner(),
        })
    }

    fn extract_metadata(&self) -> Metadata {
        let doc = self.backend.raw_doc();
        let mut metadata = Metadata::with_version(self.backend.version());
        metadata.encrypted = self.backend.is_encrypted();

        let info = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| super::backend::resolve_dict(doc, obj));

        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
        }

        metadata
    }
}

/// Validate the `%PDF-x.y` header and return the version.
fn check_header(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + 3 || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }
    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + 3];
    if !(version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit()) {
        return Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(version).to_string())
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        lopdf::Object::String(bytes, _) => Some(super::backend::decode_text_simple(bytes)),
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm'), ignoring the offset.
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
