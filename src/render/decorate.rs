//! Applies a page decorator to every page of a PDF.

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::DisplayBox;
use crate::parser::{inherited_attribute, page_box, resolve_dict};
use crate::watermark::{ContentCanvas, FontMetrics, PageDecorator};

/// Draw the decorator over every page, after the page's own content.
///
/// The existing content is wrapped in `q`/`Q` so its graphics state cannot
/// leak into the overlay. Returns the number of pages that received
/// a decoration.
pub fn decorate_document(
    pdf: &mut LopdfDocument,
    decorator: &dyn PageDecorator,
    display_box: DisplayBox,
) -> Result<usize> {
    let page_ids: Vec<ObjectId> = pdf.get_pages().into_values().collect();
    let mut font_ids: Vec<(&'static str, ObjectId)> = Vec::new();
    let mut decorated = 0;

    for page_id in page_ids {
        let bounds = page_box(pdf, page_id, display_box);
        let mut canvas = ContentCanvas::new();
        decorator.decorate(bounds, &mut canvas);
        if canvas.is_empty() {
            continue;
        }

        let fonts: Vec<&'static FontMetrics> = canvas.fonts().to_vec();
        let mut overlay = b"Q\n".to_vec();
        overlay.extend(canvas.encode()?);

        append_overlay(pdf, page_id, overlay)?;
        for font in fonts {
            let font_id = match font_ids.iter().find(|(name, _)| *name == font.resource_name) {
                Some((_, id)) => *id,
                None => {
                    let id = pdf.add_object(standard_font(font));
                    font_ids.push((font.resource_name, id));
                    id
                }
            };
            register_font(pdf, page_id, font.resource_name, font_id)?;
        }
        decorated += 1;
    }

    log::debug!("decorated {} pages", decorated);
    Ok(decorated)
}

/// Decorate a copy of a PDF and serialize it.
pub fn render_decorated(
    pdf: &LopdfDocument,
    decorator: Option<&dyn PageDecorator>,
    display_box: DisplayBox,
) -> Result<Vec<u8>> {
    let mut pdf = pdf.clone();
    if let Some(decorator) = decorator {
        decorate_document(&mut pdf, decorator, display_box)?;
    }
    let mut output = Vec::new();
    pdf.save_to(&mut output)
        .map_err(|e| Error::Render(format!("Failed to save PDF: {}", e)))?;
    Ok(output)
}

fn standard_font(font: &FontMetrics) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Bracket the page content as `q <content> Q <overlay>`.
///
/// `Contents` may be a stream, an array of streams, or a reference to
/// either; an array behind a reference is flattened into the new array.
fn append_overlay(pdf: &mut LopdfDocument, page_id: ObjectId, overlay: Vec<u8>) -> Result<()> {
    let existing = pdf
        .get_dictionary(page_id)
        .map_err(|e| Error::Render(format!("Failed to get page: {}", e)))?
        .get(b"Contents")
        .ok()
        .cloned();

    let streams: Vec<Object> = match existing {
        None => Vec::new(),
        Some(Object::Array(streams)) => streams,
        Some(Object::Reference(id)) => match pdf.get_object(id) {
            Ok(Object::Array(streams)) => streams.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(stream @ Object::Stream(_)) => vec![Object::Reference(pdf.add_object(stream))],
        Some(other) => {
            return Err(Error::Render(format!(
                "page {} {} has unusable Contents: {:?}",
                page_id.0, page_id.1, other
            )))
        }
    };

    let open_id = pdf.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = pdf.add_object(Stream::new(Dictionary::new(), overlay));

    let mut contents = Vec::with_capacity(streams.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(streams);
    contents.push(Object::Reference(overlay_id));

    let page = pdf
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| Error::Render(format!("Failed to get page: {}", e)))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Add a font to the page's own resources.
///
/// Inherited or shared resource dictionaries are copied onto the page
/// first, so other pages are left untouched.
fn register_font(
    pdf: &mut LopdfDocument,
    page_id: ObjectId,
    resource_name: &str,
    font_id: ObjectId,
) -> Result<()> {
    let mut resources = inherited_attribute(pdf, page_id, b"Resources")
        .and_then(|obj| resolve_dict(pdf, obj))
        .cloned()
        .unwrap_or_default();

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|obj| resolve_dict(pdf, obj))
        .cloned()
        .unwrap_or_default();
    fonts.set(resource_name, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = pdf
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| Error::Render(format!("Failed to get page: {}", e)))?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Rect};
    use crate::watermark::{Canvas, Watermarker};
    use lopdf::content::{Content, Operation};

    fn two_page_pdf() -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in ["Cover", "Chapter"] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_watermark_every_page() {
        let mut pdf = two_page_pdf();
        let count =
            decorate_document(&mut pdf, &Watermarker::new(), DisplayBox::CropBox).unwrap();
        assert_eq!(count, 2);

        for page_id in pdf.get_pages().into_values() {
            let page = pdf.get_dictionary(page_id).unwrap();
            let contents = page.get(b"Contents").unwrap().as_array().unwrap();
            assert_eq!(contents.len(), 3);

            let fonts = page
                .get(b"Resources")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"Font")
                .unwrap()
                .as_dict()
                .unwrap();
            // Inherited font survives next to the caption font.
            assert!(fonts.has(b"F1"));
            assert!(fonts.has(b"SampleCaptionBold"));
        }
    }

    #[test]
    fn test_overlay_closes_page_state_first() {
        let mut pdf = two_page_pdf();
        decorate_document(&mut pdf, &Watermarker::new(), DisplayBox::MediaBox).unwrap();

        let page_id = pdf.get_pages()[&1];
        let content = pdf.get_page_content(page_id).unwrap();
        let ops = Content::decode(&content).unwrap().operations;
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();

        assert_eq!(operators.first(), Some(&"q"));
        let close = operators.iter().position(|op| *op == "Q").unwrap();
        assert_eq!(operators[close + 1], "q");
        assert_eq!(operators.last(), Some(&"Q"));
        assert!(operators.contains(&"Tm"));
    }

    fn set_first_page_contents(pdf: &mut LopdfDocument, contents: Object) -> ObjectId {
        let page_id = pdf.get_pages()[&1];
        pdf.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Contents", contents);
        page_id
    }

    fn contents_of(pdf: &LopdfDocument, page_id: ObjectId) -> Vec<Object> {
        pdf.get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_array()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_referenced_contents_array_is_flattened() {
        let mut pdf = two_page_pdf();
        let page_id = pdf.get_pages()[&1];
        let body = pdf
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_reference()
            .unwrap();
        let extra = pdf.add_object(Stream::new(Dictionary::new(), b"0 0 m".to_vec()));
        let array_id = pdf.add_object(vec![Object::Reference(body), Object::Reference(extra)]);
        set_first_page_contents(&mut pdf, Object::Reference(array_id));

        decorate_document(&mut pdf, &Watermarker::new(), DisplayBox::MediaBox).unwrap();

        let contents = contents_of(&pdf, page_id);
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[1].as_reference().unwrap(), body);
        assert_eq!(contents[2].as_reference().unwrap(), extra);
        for item in &contents {
            let id = item.as_reference().unwrap();
            assert!(pdf.get_object(id).unwrap().as_stream().is_ok());
        }
    }

    #[test]
    fn test_direct_contents_stream_is_kept() {
        let mut pdf = two_page_pdf();
        let stream = Stream::new(Dictionary::new(), b"BT (Inline) Tj ET".to_vec());
        let page_id = set_first_page_contents(&mut pdf, Object::Stream(stream));

        decorate_document(&mut pdf, &Watermarker::new(), DisplayBox::MediaBox).unwrap();

        let contents = contents_of(&pdf, page_id);
        assert_eq!(contents.len(), 3);
        let kept = pdf
            .get_object(contents[1].as_reference().unwrap())
            .unwrap()
            .as_stream()
            .unwrap();
        assert_eq!(kept.content, b"BT (Inline) Tj ET");
    }

    #[test]
    fn test_unusable_contents_is_an_error() {
        let mut pdf = two_page_pdf();
        set_first_page_contents(&mut pdf, Object::Integer(7));

        assert!(matches!(
            decorate_document(&mut pdf, &Watermarker::new(), DisplayBox::MediaBox),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn test_empty_decorator_leaves_pages_alone() {
        let mut pdf = two_page_pdf();
        let nothing = |_: Option<Rect>, _: &mut dyn Canvas| {};
        let count = decorate_document(&mut pdf, &nothing, DisplayBox::CropBox).unwrap();
        assert_eq!(count, 0);

        let page_id = pdf.get_pages()[&1];
        let page = pdf.get_dictionary(page_id).unwrap();
        assert!(page.get(b"Contents").unwrap().as_reference().is_ok());
    }

    #[test]
    fn test_render_decorated_round_trips() {
        let pdf = two_page_pdf();
        let bytes =
            render_decorated(&pdf, Some(&Watermarker::new()), DisplayBox::CropBox).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reloaded = LopdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn test_page_without_bounds_is_skipped() {
        let mut pdf = two_page_pdf();
        let drawn = |bounds: Option<Rect>, canvas: &mut dyn Canvas| {
            if bounds.is_some() {
                let attributes = *Watermarker::new().attributes();
                canvas.draw_text("x", Point::new(0.0, 0.0), &attributes);
            }
        };
        // Remove the inherited media box.
        let pages_id = pdf
            .catalog()
            .unwrap()
            .get(b"Pages")
            .unwrap()
            .as_reference()
            .unwrap();
        pdf.get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .remove(b"MediaBox");

        let count = decorate_document(&mut pdf, &drawn, DisplayBox::CropBox).unwrap();
        assert_eq!(count, 0);
    }
}
