//! Splitting a document into one single-page PDF per worker

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Deserialize;
use tracing::{debug, info};

use crate::archive::build_archive;
use crate::error::{Error, Result};
use crate::pdf::text::{find_worker_name, page_text, sanitize_label, DEFAULT_WORKER_MARKER};

/// Page attributes a page may inherit from its page tree ancestors
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Options for splitting
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
    /// Text preceding the worker's name on each page
    pub worker_marker: String,
    /// Label prefix for pages without a worker name, followed by the page number
    pub fallback_prefix: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            worker_marker: DEFAULT_WORKER_MARKER.to_string(),
            fallback_prefix: "page_".to_string(),
        }
    }
}

/// One page of the source document and the name it is written under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPage {
    /// 1-based page number in the source document
    pub page_number: u32,
    pub label: String,
    /// Whether the label came from the worker marker rather than the page position
    pub from_marker: bool,
}

impl WorkerPage {
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.label)
    }
}

/// Result of a split: the naming plan and the archive bytes
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub pages: Vec<WorkerPage>,
    pub archive: Vec<u8>,
}

/// Parse a PDF from memory, rejecting documents without pages
pub fn load_document(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes)?;

    if doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf);
    }

    Ok(doc)
}

/// Decide the output name of every page
///
/// Pages resolving to an already used label get `_2`, `_3`, ... appended.
pub fn plan_split(doc: &Document, options: &SplitOptions) -> Vec<WorkerPage> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut plan = Vec::new();

    for page_number in doc.get_pages().into_keys() {
        let name = page_text(doc, page_number)
            .as_deref()
            .and_then(|text| find_worker_name(text, &options.worker_marker))
            .map(sanitize_label)
            .filter(|label| !label.is_empty());

        let from_marker = name.is_some();
        let base = name.unwrap_or_else(|| format!("{}{}", options.fallback_prefix, page_number));

        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let label = if *count == 1 {
            base
        } else {
            format!("{}_{}", base, count)
        };

        debug!(page = page_number, %label, from_marker, "planned page");
        plan.push(WorkerPage {
            page_number,
            label,
            from_marker,
        });
    }

    plan
}

/// Produce a standalone PDF holding only `page_number` (1-based)
///
/// Attributes inherited from the page tree are copied onto the page, the page
/// is re-parented under a fresh one-page tree and unreachable objects are
/// dropped.
pub fn extract_page(doc: &Document, page_number: u32) -> Result<Vec<u8>> {
    let page_id = *doc
        .get_pages()
        .get(&page_number)
        .ok_or_else(|| Error::General(format!("Page {} does not exist", page_number)))?;

    let mut single = doc.clone();
    let inherited = inherited_attributes(&single, page_id);

    let pages_id = single.new_object_id();

    if let Ok(Object::Dictionary(dict)) = single.get_object_mut(page_id) {
        for (key, value) in inherited {
            dict.set(key, value);
        }
        dict.set("Parent", Object::Reference(pages_id));
    }

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(1));
    pages_object.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    single.objects.insert(pages_id, Object::Dictionary(pages_object));

    let catalog_id = single.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    single.objects.insert(catalog_id, Object::Dictionary(catalog));

    single.trailer.set("Root", Object::Reference(catalog_id));

    // The old catalog and sibling pages are now unreachable
    single.prune_objects();
    single.compress();

    let mut buffer = Vec::new();
    single.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Inheritable attributes missing on the page, taken from the nearest ancestor
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(Object::Dictionary(page_dict)) = doc.get_object(page_id) else {
        return Vec::new();
    };

    INHERITABLE_KEYS
        .iter()
        .filter(|key| !page_dict.has(key))
        .filter_map(|key| page_attribute(doc, page_id, key).map(|value| (key.to_vec(), value)))
        .collect()
}

/// Look up `key` on the page, then on each page tree ancestor in turn
pub(crate) fn page_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);

    // Page trees are shallow; the bound guards against cyclic Parent links
    for _ in 0..64 {
        let id = current?;
        let Ok(Object::Dictionary(dict)) = doc.get_object(id) else {
            return None;
        };

        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }

        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Split `bytes` into one PDF per page, named after the worker on that page
///
/// # Example
///
/// ```no_run
/// use attendance_pdf::pdf::{split_by_worker, SplitOptions};
///
/// let input = std::fs::read("registros.pdf").unwrap();
/// let output = split_by_worker(&input, &SplitOptions::default()).unwrap();
/// std::fs::write("documentos_divididos.zip", &output.archive).unwrap();
/// ```
pub fn split_by_worker(bytes: &[u8], options: &SplitOptions) -> Result<SplitOutput> {
    let doc = load_document(bytes)?;
    let pages = plan_split(&doc, options);

    let mut entries = Vec::with_capacity(pages.len());
    for page in &pages {
        entries.push((page.file_name(), extract_page(&doc, page.page_number)?));
    }

    let archive = build_archive(&entries)?;
    info!(pages = pages.len(), bytes = archive.len(), "split document");

    Ok(SplitOutput { pages, archive })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let page = WorkerPage {
            page_number: 2,
            label: "page_2".to_string(),
            from_marker: false,
        };
        assert_eq!(page.file_name(), "page_2.pdf");
    }

    #[test]
    fn test_default_options() {
        let options = SplitOptions::default();
        assert_eq!(options.worker_marker, "Trabajador:");
        assert_eq!(options.fallback_prefix, "page_");
    }

    #[test]
    fn test_load_garbage_fails() {
        let result = load_document(b"definitely not a pdf");
        assert!(matches!(result, Err(Error::Pdf(_))));
    }

    // Tests against generated PDFs live in tests/integration.rs
}
