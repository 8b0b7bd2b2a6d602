//! Compositing the schedule table onto the first page of a document
//!
//! The table is drawn into a Form XObject that is invoked by a content stream
//! appended after the page's own streams, so the original content is left
//! untouched beneath it. The page's streams are wrapped in `q`/`Q` so any
//! transformation they leave in force is undone before the table is drawn.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::{PageDimensions, TableLayout};
use crate::pdf::split::{extract_page, load_document, page_attribute};
use crate::pdf::table::{render_table, FONT_BOLD, FONT_REGULAR};
use crate::schedule::Schedule;

/// Resource name the table XObject is registered under
const XOBJECT_NAME: &str = "ScheduleTable";

/// Options for completing a document with a schedule
#[derive(Debug, Clone, Default)]
pub struct OverlayOptions {
    pub layout: TableLayout,
    /// Keep pages after the first in the output (they are never drawn on)
    pub keep_remaining_pages: bool,
}

/// Draw `schedule` onto page 1 of the PDF in `bytes`
///
/// The output holds only the completed first page unless
/// `keep_remaining_pages` is set.
///
/// # Example
///
/// ```no_run
/// use std::collections::BTreeSet;
/// use attendance_pdf::pdf::{overlay_schedule, OverlayOptions};
/// use attendance_pdf::schedule::{generate_schedule, WorkTimes};
///
/// let holidays: BTreeSet<u32> = [1, 6].into_iter().collect();
/// let schedule = generate_schedule(2025, 1, &holidays, &WorkTimes::default()).unwrap();
///
/// let input = std::fs::read("registro_ana.pdf").unwrap();
/// let output = overlay_schedule(&input, &schedule, &OverlayOptions::default()).unwrap();
/// std::fs::write("output_completed.pdf", output).unwrap();
/// ```
pub fn overlay_schedule(bytes: &[u8], schedule: &Schedule, options: &OverlayOptions) -> Result<Vec<u8>> {
    let source = load_document(bytes)?;

    let mut doc = if options.keep_remaining_pages {
        source
    } else {
        Document::load_mem(&extract_page(&source, 1)?)?
    };

    let page_id = *doc.get_pages().values().next().ok_or(Error::EmptyPdf)?;
    let page = page_dimensions(&doc, page_id);

    let table = schedule.table();
    let origin = options.layout.origin(&page);
    let content = render_table(&table, &options.layout, origin);
    debug!(x = origin.0, y = origin.1, rows = table.len(), "rendering schedule table");

    let regular_id = add_standard_font(&mut doc, "Helvetica");
    let bold_id = add_standard_font(&mut doc, "Helvetica-Bold");
    let xobject_id = create_form_xobject(&mut doc, content, regular_id, bold_id, &page);

    add_xobject_to_page_resources(&mut doc, page_id, xobject_id)?;

    // Save the graphics state before the original content, restore it before the table
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    prepend_content_to_page(&mut doc, page_id, save_id)?;

    let invoke_content = format!("Q\nq\n/{} Do\nQ\n", XOBJECT_NAME);
    let content_stream_id = doc.add_object(Stream::new(Dictionary::new(), invoke_content.into_bytes()));
    append_content_to_page(&mut doc, page_id, content_stream_id)?;

    doc.compress();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;

    info!(
        month = schedule.month,
        year = schedule.year,
        total_hours = schedule.total_hours,
        "completed document"
    );
    Ok(buffer)
}

/// Size of the page's MediaBox, defaulting to US Letter
fn page_dimensions(doc: &Document, page_id: ObjectId) -> PageDimensions {
    let media_box = match page_attribute(doc, page_id, b"MediaBox") {
        Some(Object::Reference(id)) => doc.get_object(id).ok().cloned(),
        other => other,
    };

    if let Some(Object::Array(values)) = media_box {
        let numbers: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
        if let [llx, lly, urx, ury] = numbers[..] {
            return PageDimensions::from_box(llx, lly, urx, ury);
        }
    }

    PageDimensions::letter()
}

/// Register one of the standard 14 fonts (nothing to embed)
fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Create a Form XObject covering the page, drawn in default page coordinates
fn create_form_xobject(
    doc: &mut Document,
    content: String,
    regular_font_id: ObjectId,
    bold_font_id: ObjectId,
    page: &PageDimensions,
) -> ObjectId {
    let mut fonts = Dictionary::new();
    fonts.set(FONT_REGULAR, Object::Reference(regular_font_id));
    fonts.set(FONT_BOLD, Object::Reference(bold_font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(page.width.pt()),
            Object::Real(page.height.pt()),
        ]),
    );
    xobject_dict.set(
        "Matrix",
        Object::Array([1, 0, 0, 1, 0, 0].into_iter().map(Object::Integer).collect()),
    );
    xobject_dict.set("Resources", Object::Dictionary(resources));

    let xobject_stream = Stream {
        dict: xobject_dict,
        content: content.into_bytes(),
        allows_compression: true,
        start_position: None,
    };

    doc.add_object(Object::Stream(xobject_stream))
}

/// Add the XObject reference to the page's Resources dictionary
///
/// Inherited or referenced Resources are copied onto the page so the page
/// owns the updated dictionary.
fn add_xobject_to_page_resources(doc: &mut Document, page_id: ObjectId, xobject_id: ObjectId) -> Result<()> {
    let mut resources = match page_attribute(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        Some(Object::Reference(res_id)) => match doc.get_object(res_id) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };

    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(xo)) => xo.clone(),
        Ok(Object::Reference(xo_id)) => match doc.get_object(*xo_id) {
            Ok(Object::Dictionary(xo)) => xo.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };
    xobjects.set(XOBJECT_NAME, Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    if let Object::Dictionary(ref mut page_dict) = doc.get_object_mut(page_id)? {
        page_dict.set("Resources", Object::Dictionary(resources));
    }

    Ok(())
}

/// Insert a content stream before a page's existing Contents
fn prepend_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(ref mut page_dict) = page_obj {
        let existing_content = page_dict.get(b"Contents").ok().cloned();

        match existing_content {
            Some(Object::Reference(content_id)) => {
                let new_contents = vec![
                    Object::Reference(new_content_id),
                    Object::Reference(content_id),
                ];
                page_dict.set("Contents", Object::Array(new_contents));
            }
            Some(Object::Array(mut content_array)) => {
                content_array.insert(0, Object::Reference(new_content_id));
                page_dict.set("Contents", Object::Array(content_array));
            }
            _ => {
                page_dict.set("Contents", Object::Array(vec![Object::Reference(new_content_id)]));
            }
        }
    }

    Ok(())
}

/// Append a content stream to a page's Contents
///
/// Appended content draws on top, so background fills of the page cannot
/// cover the table.
fn append_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(ref mut page_dict) = page_obj {
        let existing_content = page_dict.get(b"Contents").ok().cloned();

        match existing_content {
            Some(Object::Reference(content_id)) => {
                let new_contents = vec![
                    Object::Reference(content_id),
                    Object::Reference(new_content_id),
                ];
                page_dict.set("Contents", Object::Array(new_contents));
            }
            Some(Object::Array(mut content_array)) => {
                content_array.push(Object::Reference(new_content_id));
                page_dict.set("Contents", Object::Array(content_array));
            }
            _ => {
                page_dict.set("Contents", Object::Array(vec![Object::Reference(new_content_id)]));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn single_page(contents: Object) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => contents,
        });
        (doc, page_id)
    }

    fn contents(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        page.get(b"Contents")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_reference().unwrap())
            .collect()
    }

    #[test]
    fn test_prepend_and_append_around_reference() {
        let mut doc = Document::with_version("1.5");
        let original = doc.add_object(Stream::new(Dictionary::new(), b"BT ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => original,
        });
        let before = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let after = doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec()));

        prepend_content_to_page(&mut doc, page_id, before).unwrap();
        append_content_to_page(&mut doc, page_id, after).unwrap();

        assert_eq!(contents(&doc, page_id), vec![before, original, after]);
    }

    #[test]
    fn test_prepend_into_array() {
        let (mut doc, page_id) = single_page(Object::Array(vec![]));
        let first = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let second = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

        append_content_to_page(&mut doc, page_id, second).unwrap();
        prepend_content_to_page(&mut doc, page_id, first).unwrap();

        assert_eq!(contents(&doc, page_id), vec![first, second]);
    }
}
