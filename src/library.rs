//! The bundled book catalog and its on-disk layout.

use std::path::{Path, PathBuf};

/// Titles of the bundled books, in display order.
pub const BUNDLED_BOOKS: [&str; 11] = [
    "Advanced iOS Volume One",
    "Beyond Code",
    "Hacking with macOS",
    "Hacking with Swift",
    "Hacking with tvOS",
    "Hacking with watchOS",
    "Objective-C for Swift Developers",
    "Practical iOS 11",
    "Pro Swift",
    "Server-Side Swift",
    "Swift Coding Challenges",
];

/// File extension of book resources.
pub const BOOK_EXTENSION: &str = "pdf";

/// Resource name of a title: spaces become dashes, then lowercase.
///
/// `"Pro Swift"` becomes `"pro-swift"`.
pub fn resource_name(title: &str) -> String {
    title.replace(' ', "-").to_lowercase()
}

/// A directory of book resources named `<resource-name>.pdf`.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the resource for a title would have, whether or not it exists.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", resource_name(title), BOOK_EXTENSION))
    }

    /// Locate the resource for a title.
    ///
    /// Any title is accepted, not just the catalog ones.
    pub fn resolve(&self, title: &str) -> Option<PathBuf> {
        let path = self.path_for(title);
        if path.is_file() {
            Some(path)
        } else {
            log::debug!("no resource for '{}' at {}", title, path.display());
            None
        }
    }

    /// The catalog titles.
    pub fn titles(&self) -> &'static [&'static str] {
        &BUNDLED_BOOKS
    }

    /// Catalog titles whose resource exists.
    pub fn available(&self) -> Vec<&'static str> {
        BUNDLED_BOOKS
            .iter()
            .copied()
            .filter(|title| self.path_for(title).is_file())
            .collect()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new("books")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resource_names() {
        let names: Vec<String> = BUNDLED_BOOKS.iter().map(|t| resource_name(t)).collect();
        assert_eq!(
            names,
            vec![
                "advanced-ios-volume-one",
                "beyond-code",
                "hacking-with-macos",
                "hacking-with-swift",
                "hacking-with-tvos",
                "hacking-with-watchos",
                "objective-c-for-swift-developers",
                "practical-ios-11",
                "pro-swift",
                "server-side-swift",
                "swift-coding-challenges",
            ]
        );
    }

    #[test]
    fn test_resource_name_keeps_other_characters() {
        assert_eq!(resource_name("Server-Side  Swift"), "server-side--swift");
        assert_eq!(resource_name(""), "");
    }

    #[test]
    fn test_dotted_title_keeps_its_dots() {
        let library = Library::new("/books");
        assert_eq!(
            library.path_for("Swift 5.1 Guide"),
            Path::new("/books/swift-5.1-guide.pdf")
        );
        assert_eq!(
            library.path_for("Pro Swift"),
            Path::new("/books/pro-swift.pdf")
        );
    }

    #[test]
    fn test_resolve_existing_resource() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pro-swift.pdf"), b"%PDF-1.4\n").unwrap();

        let library = Library::new(dir.path());
        assert_eq!(
            library.resolve("Pro Swift"),
            Some(dir.path().join("pro-swift.pdf"))
        );
        assert_eq!(library.resolve("Beyond Code"), None);
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("beyond-code.pdf")).unwrap();
        assert_eq!(Library::new(dir.path()).resolve("Beyond Code"), None);
    }

    #[test]
    fn test_available_keeps_catalog_order() {
        let dir = TempDir::new().unwrap();
        for name in ["swift-coding-challenges", "beyond-code", "unlisted"] {
            std::fs::write(dir.path().join(format!("{}.pdf", name)), b"").unwrap();
        }

        let library = Library::new(dir.path());
        assert_eq!(library.titles().len(), 11);
        assert_eq!(
            library.available(),
            vec!["Beyond Code", "Swift Coding Challenges"]
        );
    }
}
