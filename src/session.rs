//! The reading session: one open book, its text, and the reader's place in it.

use std::ops::Range;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::extract::{ExtractedText, TextExtractionPipeline};
use crate::library::Library;
use crate::model::{Document, Page};
use crate::parser::{DocumentLoader, LoadOptions, LoadedDocument};
use crate::render::render_decorated;

/// How the book is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    /// Rendered pages
    #[default]
    Pdf,
    /// The extracted text
    Text,
}

/// A byte range of one page's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub page: usize,
    pub range: Range<usize>,
}

impl Selection {
    pub fn new(page: usize, range: Range<usize>) -> Self {
        Self { page, range }
    }
}

/// State of a reader working through one book at a time.
#[derive(Debug)]
pub struct Session {
    library: Library,
    options: LoadOptions,
    pipeline: TextExtractionPipeline,
    loaded: Option<LoadedDocument>,
    text: Option<ExtractedText>,
    title: Option<String>,
    current_page: usize,
    highlighted: Vec<Selection>,
    selection: Option<Selection>,
    view_mode: ViewMode,
}

impl Session {
    /// Create a session over a library, decorating pages with the caption.
    ///
    /// Pages whose text cannot be read are loaded without text.
    pub fn new(library: Library) -> Self {
        Self::with_options(
            library,
            LoadOptions::reader(),
            TextExtractionPipeline::default(),
        )
    }

    pub fn with_options(
        library: Library,
        options: LoadOptions,
        pipeline: TextExtractionPipeline,
    ) -> Self {
        Self {
            library,
            options,
            pipeline,
            loaded: None,
            text: None,
            title: None,
            current_page: 0,
            highlighted: Vec::new(),
            selection: None,
            view_mode: ViewMode::default(),
        }
    }

    /// Open a book by title.
    ///
    /// Returns `false`, leaving the session as it was, when the title has no
    /// resource or the resource cannot be opened.
    pub fn load(&mut self, title: &str) -> bool {
        let Some(path) = self.library.resolve(title) else {
            return false;
        };
        match self.open(&path) {
            Ok(loaded) => {
                self.install(loaded, title.to_string());
                true
            }
            Err(e) => {
                log::warn!("Failed to open '{}': {}", path.display(), e);
                false
            }
        }
    }

    /// Open a book from a file outside the library.
    ///
    /// The title becomes the document title, or the file stem if it has none.
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let loaded = self.open(path)?;
        let title = loaded
            .document
            .metadata
            .title
            .clone()
            .or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_default();
        self.install(loaded, title);
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<LoadedDocument> {
        DocumentLoader::open_with_options(path, self.options.clone())?.load()
    }

    fn install(&mut self, loaded: LoadedDocument, title: String) {
        log::info!(
            "Loaded '{}' ({} pages)",
            title,
            loaded.document.page_count()
        );
        // An undeterminable page count keeps the previous text.
        if let Some(text) = self.pipeline.run(&loaded.document) {
            self.text = Some(text);
        }
        self.loaded = Some(loaded);
        self.title = Some(title);
        self.current_page = 0;
        self.highlighted.clear();
        self.selection = None;
    }

    // Navigation

    pub fn go_to_first_page(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn go_to_next_page(&mut self) -> bool {
        if self.current_page + 1 >= self.page_count() {
            return false;
        }
        self.go_to(self.current_page + 1)
    }

    pub fn go_to_previous_page(&mut self) -> bool {
        if self.current_page == 0 {
            return false;
        }
        self.go_to(self.current_page - 1)
    }

    /// Jump to a page by index.
    pub fn go_to_page(&mut self, index: usize) -> Result<bool> {
        let count = self.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        Ok(self.go_to(index))
    }

    fn go_to(&mut self, index: usize) -> bool {
        if self.loaded.is_none() || index == self.current_page {
            return false;
        }
        self.current_page = index;
        true
    }

    // Search

    /// Find the next case-insensitive occurrence of `query`.
    ///
    /// The search starts right after the current highlight, or at the
    /// beginning of the book, and does not wrap. A match becomes the only
    /// highlight and its page the current page.
    pub fn search(&mut self, query: &str) -> Option<Selection> {
        let regex = literal_pattern(query)?;
        let document = self.document()?;

        let (start_page, start_offset) = self
            .highlighted
            .first()
            .map(|s| (s.page, s.range.end))
            .unwrap_or((0, 0));

        let found = document
            .pages
            .iter()
            .enumerate()
            .skip(start_page)
            .find_map(|(index, page)| {
                let text = page.plain_text();
                let offset = if index == start_page { start_offset } else { 0 };
                if offset > text.len() {
                    return None;
                }
                regex
                    .find_at(text, offset)
                    .map(|m| Selection::new(index, m.range()))
            });

        match &found {
            Some(selection) => {
                self.current_page = selection.page;
                self.highlighted = vec![selection.clone()];
            }
            None => log::debug!("no further match for '{}'", query),
        }
        found
    }

    /// Every occurrence of `query`, without touching the session state.
    pub fn find_all(&self, query: &str) -> Vec<Selection> {
        let (Some(regex), Some(document)) = (literal_pattern(query), self.document()) else {
            return Vec::new();
        };
        document
            .pages
            .iter()
            .enumerate()
            .flat_map(|(index, page)| {
                regex
                    .find_iter(page.plain_text())
                    .map(move |m| Selection::new(index, m.range()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    // Selection and sharing

    /// Select a range of a page's text.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        let page = self.page_at(selection.page)?;
        let text = page.plain_text();
        if text.get(selection.range.clone()).is_none() {
            return Err(Error::Other(format!(
                "selection {:?} is outside page {} text",
                selection.range, selection.page
            )));
        }
        self.selection = Some(selection);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text of the current selection.
    pub fn selected_text(&self) -> Option<&str> {
        let selection = self.selection.as_ref()?;
        let page = self.document()?.page(selection.page)?;
        page.plain_text().get(selection.range.clone())
    }

    /// The selected text, ready to hand to a share target.
    pub fn share_selection(&self) -> Result<String> {
        match self.selected_text() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(Error::NoSelection),
        }
    }

    // View mode

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = match self.view_mode {
            ViewMode::Pdf => ViewMode::Text,
            ViewMode::Text => ViewMode::Pdf,
        };
        self.view_mode
    }

    /// What the current view mode shows: the current page's text, or the
    /// extracted text of the whole book.
    pub fn visible_text(&self) -> Option<&str> {
        match self.view_mode {
            ViewMode::Pdf => self.current().map(Page::plain_text),
            ViewMode::Text => self.text.as_ref().map(ExtractedText::as_str),
        }
    }

    // Rendering

    /// The open book as PDF bytes, with the configured decoration on every page.
    pub fn render_to_bytes(&self) -> Result<Vec<u8>> {
        let loaded = self.loaded.as_ref().ok_or(Error::NoDocument)?;
        render_decorated(
            &loaded.pdf,
            self.options.decorator.as_deref(),
            self.options.display_box,
        )
    }

    /// Write the decorated book to a file.
    pub fn render_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.render_to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    // Accessors

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn loaded(&self) -> Option<&LoadedDocument> {
        self.loaded.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.loaded.as_ref().map(|l| &l.document)
    }

    pub fn text(&self) -> Option<&ExtractedText> {
        self.text.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.document().map_or(0, Document::page_count)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The page being shown.
    pub fn current(&self) -> Option<&Page> {
        self.document()?.page(self.current_page)
    }

    pub fn highlighted(&self) -> &[Selection] {
        &self.highlighted
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn page_at(&self, index: usize) -> Result<&Page> {
        let document = self.document().ok_or(Error::NoDocument)?;
        document
            .page(index)
            .ok_or(Error::PageOutOfRange(index, document.page_count()))
    }
}

fn literal_pattern(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}
