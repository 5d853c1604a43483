//! PDF loading module.

mod backend;
mod loader;
mod options;
mod text;

pub use backend::{
    decode_text_simple, page_box, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend,
    PdfValue,
};
pub(crate) use backend::{inherited_attribute, resolve_dict};
pub use loader::{DocumentLoader, LoadedDocument};
pub use options::{ErrorMode, LoadOptions};
pub use text::extract_styled_text;
