//! In-memory PDF books for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

enum PageSpec {
    Lines(Vec<String>),
    Operations(Vec<Operation>),
    Broken,
}

/// Builds a small PDF whose pages show lines of Helvetica text.
#[derive(Default)]
pub struct BookBuilder {
    title: Option<String>,
    crop_box: Option<[i64; 4]>,
    pages: Vec<PageSpec>,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Crop box set on every page; the media box is always 612 x 792.
    pub fn crop_box(mut self, crop_box: [i64; 4]) -> Self {
        self.crop_box = Some(crop_box);
        self
    }

    /// A page with one text line per entry; no entries gives a blank page.
    pub fn page(mut self, lines: &[&str]) -> Self {
        self.pages.push(PageSpec::Lines(
            lines.iter().map(|line| line.to_string()).collect(),
        ));
        self
    }

    /// A page with a hand-written content stream.
    pub fn page_with_operations(mut self, operations: Vec<Operation>) -> Self {
        self.pages.push(PageSpec::Operations(operations));
        self
    }

    /// A page whose `Contents` is not a stream.
    pub fn broken_page(mut self) -> Self {
        self.pages.push(PageSpec::Broken);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => regular_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for kind in self.pages {
            let contents_id = match kind {
                PageSpec::Lines(lines) => {
                    let content = Content {
                        operations: page_operations(&lines),
                    };
                    doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()))
                }
                PageSpec::Operations(operations) => {
                    let content = Content { operations };
                    doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()))
                }
                PageSpec::Broken => doc.add_object(dictionary! { "Not" => "AStream" }),
            };

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents_id,
            };
            if let Some(crop) = self.crop_box {
                page.set(
                    "CropBox",
                    crop.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
                );
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title.as_str()),
                "Producer" => Object::string_literal("pdfsampler tests"),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Write the book into `dir` under `file_name`.
    pub fn write(self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

fn page_operations(lines: &[String]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.as_str())],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// A three page book: cover, then two pages stamped with the publisher footer.
pub fn sample_book() -> BookBuilder {
    BookBuilder::new()
        .title("Pro Swift")
        .page(&["Pro Swift", "Paul Hudson"])
        .page(&["Chapter 1", "Syntax", "www.hackingwithswift.com 2"])
        .page(&["Closures capture values", "www.hackingwithswift.com 3"])
}
