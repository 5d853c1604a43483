//! Output rendering: decorated PDFs and JSON reports.

mod decorate;
mod json;

pub use decorate::{decorate_document, render_decorated};
pub use json::{to_json, JsonFormat};
