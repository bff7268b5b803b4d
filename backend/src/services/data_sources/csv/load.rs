//! Parsing and normalization of stored CSV data.
//!
//! The engine's contract is strict: lowercase trimmed header names, trimmed
//! cell values, every row carrying the full key set. All of that is enforced
//! here, once, so downstream code never second-guesses its input.

use crate::config::UPLOAD_DIR;
use common::model::dataset::Row;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Pick the delimiter that occurs most often in the header line. Defaults to
/// a comma for degenerate single-column files.
pub fn detect_delimiter(header_line: &str) -> char {
    DELIMITER_CANDIDATES
        .iter()
        .max_by_key(|&&d| header_line.matches(d).count())
        .copied()
        .unwrap_or(',')
}

/// Path of a stored data source. Ids are md5 hex digests; anything else is
/// rejected so a crafted id cannot reach outside the uploads directory.
pub fn source_path(source_id: &str) -> Result<PathBuf, String> {
    if source_id.len() != 32 || !source_id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Invalid data source id".to_string());
    }
    Ok(Path::new(UPLOAD_DIR).join(format!("{}.csv", source_id)))
}

/// Read and parse a stored data source into normalized rows + headers.
pub fn load_source(source_id: &str) -> Result<(Vec<Row>, Vec<String>), String> {
    let path = source_path(source_id)?;
    read_csv_file(&path)
}

/// Read and parse a CSV file on disk. Non-UTF-8 bytes are replaced rather
/// than rejected; spreadsheet exports are messy.
pub fn read_csv_file(path: &Path) -> Result<(Vec<Row>, Vec<String>), String> {
    let bytes = fs::read(path).map_err(|e| format!("Cannot read data source: {}", e))?;
    parse_csv_text(&String::from_utf8_lossy(&bytes))
}

/// Parse CSV text into normalized rows and an ordered lowercase header list.
pub fn parse_csv_text(text: &str) -> Result<(Vec<Row>, Vec<String>), String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| e.to_string())?;

    // Normalization is per-row independent; fan out for large files. Order
    // is preserved by collecting back into a Vec.
    let rows: Vec<Row> = records
        .par_iter()
        .map(|record| {
            let mut row = Row::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                let value = record.get(i).unwrap_or("").trim().to_string();
                row.insert(header.clone(), value);
            }
            row
        })
        .collect();

    Ok((rows, headers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_most_frequent_delimiter() {
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a;b;c"), ';');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c,d"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn parses_and_normalizes_rows() {
        let text = "Name, Firm ,Email\nJane Doe,Acme, jane@acme.com \n";
        let (rows, headers) = parse_csv_text(text).unwrap();
        assert_eq!(headers, vec!["name", "firm", "email"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Jane Doe");
        assert_eq!(rows[0]["firm"], "Acme");
        assert_eq!(rows[0]["email"], "jane@acme.com");
    }

    #[test]
    fn handles_semicolon_delimited_files() {
        let text = "Name;Firm\nJane;Acme\n";
        let (rows, headers) = parse_csv_text(text).unwrap();
        assert_eq!(headers, vec!["name", "firm"]);
        assert_eq!(rows[0]["firm"], "Acme");
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let text = "\u{feff}Name,Email\nJane,j@x.co\n";
        let (_, headers) = parse_csv_text(text).unwrap();
        assert_eq!(headers[0], "name");
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let text = "name,firm\n\"Doe, Jane\",Acme\n";
        let (rows, _) = parse_csv_text(text).unwrap();
        assert_eq!(rows[0]["name"], "Doe, Jane");
    }

    #[test]
    fn short_records_fill_missing_cells_with_empty() {
        let text = "name,firm,email\nJane\n";
        let (rows, headers) = parse_csv_text(text).unwrap();
        assert_eq!(rows[0]["name"], "Jane");
        assert_eq!(rows[0]["firm"], "");
        assert_eq!(rows[0].len(), headers.len());
    }

    #[test]
    fn case_insensitive_header_collision_is_last_write_wins() {
        let text = "Name,NAME\nfirst,second\n";
        let (rows, headers) = parse_csv_text(text).unwrap();
        assert_eq!(headers, vec!["name", "name"]);
        assert_eq!(rows[0]["name"], "second");
    }

    #[test]
    fn reads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Name,Email\nJane Doe,jane@acme.com\n").unwrap();

        let (rows, headers) = read_csv_file(&path).unwrap();
        assert_eq!(headers, vec!["name", "email"]);
        assert_eq!(rows[0]["email"], "jane@acme.com");
    }

    #[test]
    fn source_ids_must_be_md5_hex() {
        assert!(source_path("0123456789abcdef0123456789abcdef").is_ok());
        assert!(source_path("../../etc/passwd").is_err());
        assert!(source_path("short").is_err());
        assert!(source_path("0123456789abcdef0123456789abcdeg").is_err());
    }
}
