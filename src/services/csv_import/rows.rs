//! CSV row parser
//!
//! Turns a comma-separated upload (header line + data lines) into a lazy,
//! ordered, single-pass sequence of column-name -> value mappings. The
//! sequence borrows nothing: consuming it exhausts the underlying reader,
//! so a second pass needs a fresh handle.

use std::io::Read;
use std::path::Path;

use crate::types::CsvRow;

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b',')
        .has_headers(true)
        .flexible(true);
    builder
}

/// Open an uploaded file as a lazy row sequence.
///
/// Fails immediately if the file cannot be opened; a read or decode failure
/// mid-stream surfaces as an `Err` item, at which point the sequence must be
/// abandoned — no partial row is yielded for the record that failed.
pub fn open_rows(path: &Path) -> csv::Result<impl Iterator<Item = csv::Result<CsvRow>>> {
    let reader = builder().from_path(path)?;
    Ok(reader.into_deserialize::<CsvRow>())
}

/// Row sequence over an in-memory reader; same contract as [`open_rows`]
pub fn read_rows<R: Read>(input: R) -> impl Iterator<Item = csv::Result<CsvRow>> {
    builder().from_reader(input).into_deserialize::<CsvRow>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_rows_map_header_names_to_values() {
        let csv = "name,sku,unit\nRice,RICE-01,kg\nDal,DAL-02,kg\n";
        let rows: Vec<CsvRow> = read_rows(Cursor::new(csv))
            .collect::<csv::Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name").map(String::as_str), Some("Rice"));
        assert_eq!(rows[0].get("sku").map(String::as_str), Some("RICE-01"));
        assert_eq!(rows[1].get("unit").map(String::as_str), Some("kg"));
    }

    #[test]
    fn test_rows_preserve_file_order() {
        let csv = "name\nfirst\nsecond\nthird\n";
        let names: Vec<String> = read_rows(Cursor::new(csv))
            .map(|r| r.unwrap().remove("name").unwrap())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_header_only_file_yields_no_rows() {
        let csv = "name,sku\n";
        assert_eq!(read_rows(Cursor::new(csv)).count(), 0);
    }

    #[test]
    fn test_invalid_utf8_surfaces_as_stream_error() {
        let bytes: Vec<u8> = b"name\n\xff\xfe\n".to_vec();
        let results: Vec<csv::Result<CsvRow>> = read_rows(Cursor::new(bytes)).collect();
        assert!(results.iter().any(|r| r.is_err()));
    }

    #[test]
    fn test_open_rows_missing_file_fails_up_front() {
        assert!(open_rows(Path::new("/nonexistent/upload.csv")).is_err());
    }

    #[test]
    fn test_open_rows_reads_a_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.csv");
        std::fs::write(&path, "name\nGrains\nSpices\n").unwrap();

        let rows: Vec<CsvRow> = open_rows(&path).unwrap().collect::<csv::Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name").map(String::as_str), Some("Spices"));
    }
}
