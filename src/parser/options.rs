//! Loading options and configuration.

use std::fmt;
use std::sync::Arc;

use crate::model::DisplayBox;
use crate::watermark::{PageDecorator, Watermarker};

/// Options for loading a book.
#[derive(Clone)]
pub struct LoadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page box used for layout and decoration
    pub display_box: DisplayBox,

    /// Decoration applied uniformly to every page when rendering
    pub decorator: Option<Arc<dyn PageDecorator>>,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages whose text cannot be read load without text).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the display box.
    pub fn with_display_box(mut self, display_box: DisplayBox) -> Self {
        self.display_box = display_box;
        self
    }

    /// Set the page decorator.
    pub fn with_decorator(mut self, decorator: Arc<dyn PageDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Options for reading a book: unreadable page text is skipped and every
    /// page is decorated with the caption.
    pub fn reader() -> Self {
        Self::new().lenient().with_watermark()
    }

    /// Decorate every page with the "SAMPLE CHAPTER" caption.
    pub fn with_watermark(self) -> Self {
        self.with_decorator(Arc::new(Watermarker::new()))
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            display_box: DisplayBox::default(),
            decorator: None,
        }
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("error_mode", &self.error_mode)
            .field("display_box", &self.display_box)
            .field("decorator", &self.decorator.is_some())
            .finish()
    }
}

/// Error handling mode during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip unreadable page text and continue
    Lenient,
}
