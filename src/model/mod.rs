//! Document model types for opened books.
//!
//! The model is independent of the PDF library: pages carry their boxes
//! and extracted styled text, which is all the extraction pipeline, the
//! session and the search need.

mod document;
mod geometry;
mod page;
mod styled;

pub use document::{Document, Metadata};
pub use geometry::{DisplayBox, Point, Rect, Size};
pub use page::Page;
pub use styled::{StyleSpan, StyledText, TextStyle};
