//! In-memory ZIP archive of per-worker documents

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Bundle `(file name, contents)` pairs into a ZIP archive
pub fn build_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(contents)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_archive_contents() {
        let entries = vec![
            ("Ana.pdf".to_string(), b"first".to_vec()),
            ("page_2.pdf".to_string(), b"second".to_vec()),
        ];

        let bytes = build_archive(&entries).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("page_2.pdf")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "second");
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
