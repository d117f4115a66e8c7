//! Decoding and delimited-text plumbing shared by every reader and writer.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads a file and decodes it with the named encoding.
///
/// Any WHATWG label is accepted (`utf-8`, `windows-1252`, `latin1`, ...). A
/// byte-order mark is removed; carriage returns are stripped everywhere
/// because the registry export carries stray CRs inside titles.
pub fn read_decoded(path: &Path, encoding_label: &str) -> Result<String> {
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
        IngestError::UnknownEncoding {
            path: path.to_path_buf(),
            label: encoding_label.to_string(),
        }
    })?;
    let bytes = fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(IngestError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }
    debug!(
        path = %path.display(),
        encoding = encoding.name(),
        bytes = bytes.len(),
        "decoded file"
    );
    Ok(text.replace('\r', ""))
}

pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(IngestError::InvalidDelimiter { delimiter })
    }
}

/// A delimited file held in memory: header row plus data rows.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    /// Data rows with their 1-based line numbers in the source file.
    pub rows: Vec<(u64, Vec<String>)>,
}

impl DelimitedTable {
    /// Reads and parses a delimited file.
    ///
    /// Rows whose cells are all blank are dropped. Rows may be shorter or
    /// longer than the header; callers decide what a short row means.
    pub fn read(path: &Path, delimiter: char, encoding: &str) -> Result<Self> {
        let text = read_decoded(path, encoding)?;
        Self::parse(path, &text, delimiter)
    }

    pub fn parse(path: &Path, text: &str, delimiter: char) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let line = record.position().map_or(0, csv::Position::line);
            let cells: Vec<String> = record.iter().map(normalize_cell).collect();
            if headers.is_none() {
                headers = Some(cells);
                continue;
            }
            if cells.iter().all(String::is_empty) {
                continue;
            }
            rows.push((line, cells));
        }
        let headers = headers.ok_or_else(|| IngestError::EmptyFile {
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn columns(&self) -> ColumnIndex {
        ColumnIndex::new(&self.headers)
    }

    /// Position of a required column, or [`IngestError::MissingColumn`].
    pub fn require(&self, column: &str) -> Result<usize> {
        self.columns()
            .get(column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_string(),
                path: self.path.clone(),
            })
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Case-insensitive header lookup.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            positions.entry(header.trim().to_lowercase()).or_insert(idx);
        }
        Self { positions }
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.positions.get(&column.trim().to_lowercase()).copied()
    }
}

/// Returns the trimmed cell at `idx`, or `None` when the row is too short.
pub(crate) fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

/// Returns the cell at `idx` if present and non-blank.
pub(crate) fn optional_cell(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|idx| cell(row, idx))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Writes rows as delimited UTF-8 text.
///
/// Output goes to a sibling temporary file that is renamed over `path` once
/// complete, so a failed write never leaves a truncated file behind.
pub fn write_delimited(
    path: &Path,
    delimiter: char,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    stage_delimited(path, delimiter, headers, rows)?.commit()
}

/// Writes rows to the staging file for `path` without replacing `path`.
///
/// Commit several staged files together once all of them are written.
pub fn stage_delimited(
    path: &Path,
    delimiter: char,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<StagedFile> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    let csv_error = |e: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    let bytes = writer.into_inner().map_err(|e| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
    }
    let staged = StagedFile::new(path);
    fs::write(&staged.staging, &bytes).map_err(|e| IngestError::write(&staged.staging, e))?;
    debug!(path = %path.display(), rows = rows.len(), "staged delimited file");
    Ok(staged)
}

/// A complete file waiting next to its destination.
///
/// Dropped without [`StagedFile::commit`], the staging file is removed and
/// the destination is left untouched.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    staging: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(path: &Path) -> Self {
        let mut staging = path.as_os_str().to_owned();
        staging.push(".partial");
        Self {
            path: path.to_path_buf(),
            staging: PathBuf::from(staging),
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the staging file over the destination.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.staging, &self.path).map_err(|e| IngestError::write(&self.path, e))?;
        self.committed = true;
        debug!(path = %self.path.display(), "wrote delimited file");
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staging);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_decode_windows_1252() {
        // 0xE9 is 'é' in windows-1252 and invalid as a lone UTF-8 byte.
        let file = create_temp_file(b"Title\r\nCaf\xe9\r\n");
        let text = read_decoded(file.path(), "windows-1252").unwrap();
        assert_eq!(text, "Title\nCafé\n");
    }

    #[test]
    fn test_decode_latin1_label() {
        let file = create_temp_file(b"Caf\xe9");
        assert_eq!(read_decoded(file.path(), "latin1").unwrap(), "Café");
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let file = create_temp_file(b"Caf\xe9");
        let result = read_decoded(file.path(), "utf-8");
        assert!(matches!(result, Err(IngestError::Decode { .. })));
    }

    #[test]
    fn test_unknown_encoding() {
        let file = create_temp_file(b"x");
        let result = read_decoded(file.path(), "klingon");
        assert!(matches!(result, Err(IngestError::UnknownEncoding { .. })));
    }

    #[test]
    fn test_utf8_bom_removed() {
        let file = create_temp_file(b"\xef\xbb\xbfA\tB\n1\t2\n");
        let table = DelimitedTable::read(file.path(), '\t', "utf-8").unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_skips_blank_rows_and_tracks_lines() {
        let text = "A\tB\n1\t2\n\t\n3\t4\n";
        let table = DelimitedTable::parse(Path::new("t.tsv"), text, '\t').unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].0, 2);
        assert_eq!(table.rows[1].0, 4);
        assert_eq!(table.rows[1].1, vec!["3", "4"]);
    }

    #[test]
    fn test_empty_file() {
        let result = DelimitedTable::parse(Path::new("e.tsv"), "", '\t');
        assert!(matches!(result, Err(IngestError::EmptyFile { .. })));
    }

    #[test]
    fn test_column_index_case_insensitive() {
        let index = ColumnIndex::new(&["Compound Name".to_string(), "Notes".to_string()]);
        assert_eq!(index.get("compound name"), Some(0));
        assert_eq!(index.get(" NOTES "), Some(1));
        assert_eq!(index.get("Page"), None);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let result = DelimitedTable::parse(Path::new("x"), "a", '¦');
        assert!(matches!(result, Err(IngestError::InvalidDelimiter { .. })));
    }

    #[test]
    fn test_write_delimited_quotes_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_delimited(
            &path,
            '\t',
            &["Drugs", "Pubchem"],
            &[vec!["Saline".to_string(), "5234, 5360545".to_string()]],
        )
        .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Drugs\tPubchem\nSaline\t5234, 5360545\n");
        assert!(!dir.path().join("out.tsv.partial").exists());
    }

    #[test]
    fn test_staged_file_is_invisible_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let staged = stage_delimited(&path, '\t', &["Drugs"], &[vec!["Saline".to_string()]])
            .unwrap();
        assert!(!path.exists());
        assert!(dir.path().join("out.tsv.partial").exists());
        staged.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Drugs\nSaline\n");
    }

    #[test]
    fn test_dropped_staged_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("out.tsv"), "old\n").unwrap();
        let path = dir.path().join("out.tsv");
        drop(stage_delimited(&path, '\t', &["Drugs"], &[]).unwrap());
        assert!(!dir.path().join("out.tsv.partial").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\n");
    }
}
