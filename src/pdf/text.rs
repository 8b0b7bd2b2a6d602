//! Page text extraction and worker labels

use lopdf::Document;
use tracing::warn;

use crate::error::Result;
use crate::period::{extract_period, Period};

/// Default text preceding a worker's name
pub const DEFAULT_WORKER_MARKER: &str = "Trabajador:";

/// Characters that cannot appear in archive entry names
const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extract the text of one page (1-based)
///
/// Pages whose text cannot be decoded yield `None` and a warning; callers
/// treat that the same as a page without any marker.
pub fn page_text(doc: &Document, page_number: u32) -> Option<String> {
    match doc.extract_text(&[page_number]) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(page = page_number, error = %e, "could not extract page text");
            None
        }
    }
}

/// Read the month/year printed after `marker` on the first page
///
/// An undecodable first page is reported as a missing marker. Failures come
/// back as [`Error::Period`](crate::Error::Period).
pub fn document_period(doc: &Document, marker: &str) -> Result<Period> {
    let text = doc
        .get_pages()
        .into_keys()
        .next()
        .and_then(|first| page_text(doc, first))
        .unwrap_or_default();
    Ok(extract_period(&text, marker)?)
}

/// The worker name following `marker`
///
/// The name is the rest of the marker's line. When that is blank the name was
/// drawn as a separate text run, which extraction puts on its own line, so
/// the next non-blank line is used instead unless it is another `Label:`.
/// Returns `None` when the marker is missing or no name follows it.
pub fn find_worker_name<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let mut lines = text[start..].lines();

    let same_line = lines.next().unwrap_or("").trim();
    if !same_line.is_empty() {
        return Some(same_line);
    }

    lines
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| !line.ends_with(':'))
}

/// Turn a worker name into a token usable as a file name
///
/// Whitespace and path/reserved characters become `_`.
pub fn sanitize_label(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() || UNSAFE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_worker_name() {
        let text = "REGISTRO DE JORNADA\nTrabajador: Juan Perez Garcia\nNIF: 12345678Z\n";
        assert_eq!(find_worker_name(text, DEFAULT_WORKER_MARKER), Some("Juan Perez Garcia"));
    }

    #[test]
    fn test_find_worker_name_at_end_of_text() {
        assert_eq!(find_worker_name("Trabajador:Ana", DEFAULT_WORKER_MARKER), Some("Ana"));
    }

    #[test]
    fn test_find_worker_name_on_next_line() {
        // Label and value drawn as separate text runs
        let text = "Trabajador:\nAna Lopez\nNIF:\n12345678Z\n";
        assert_eq!(find_worker_name(text, DEFAULT_WORKER_MARKER), Some("Ana Lopez"));

        let text = "Trabajador:  \n\n  Marc Puig  \n";
        assert_eq!(find_worker_name(text, DEFAULT_WORKER_MARKER), Some("Marc Puig"));
    }

    #[test]
    fn test_missing_or_empty_name() {
        assert_eq!(find_worker_name("NIF: 12345678Z", DEFAULT_WORKER_MARKER), None);
        assert_eq!(find_worker_name("Trabajador:   \nNIF:\n", DEFAULT_WORKER_MARKER), None);
        assert_eq!(find_worker_name("Trabajador:\n  \n", DEFAULT_WORKER_MARKER), None);
        assert_eq!(find_worker_name("Trabajador:", DEFAULT_WORKER_MARKER), None);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Juan Perez Garcia"), "Juan_Perez_Garcia");
        assert_eq!(sanitize_label("  Ana  "), "Ana");
        assert_eq!(sanitize_label("A/B\\C:D"), "A_B_C_D");
        assert_eq!(sanitize_label("José Muñoz"), "José_Muñoz");
    }
}
