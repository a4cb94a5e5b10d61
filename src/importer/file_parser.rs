// ==========================================
// Humidor Hub - Tabular parser
// ==========================================
// Supports: delimited text (.csv / .txt / .tsv) and
// Excel workbooks (.xlsx / .xls, first sheet)
// Output: RawTable (header row + string cells)
// ==========================================

use crate::domain::mapping::RawTable;
use crate::importer::catalog_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;
use tracing::debug;

fn is_blank<'a>(mut cells: impl Iterator<Item = &'a str>) -> bool {
    cells.all(|cell| cell.trim().is_empty())
}

/// Normalize parsed rows into a RawTable
///
/// - blank rows are skipped
/// - short rows are padded with empty cells
/// - long rows are truncated to the header width
fn assemble_table(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> ImportResult<RawTable> {
    let width = headers.len();
    let mut rows = Vec::with_capacity(raw_rows.len());

    for mut row in raw_rows {
        if is_blank(row.iter().map(String::as_str)) {
            continue;
        }
        if row.len() != width {
            debug!(expected = width, actual = row.len(), "ragged row normalized");
            row.resize(width, String::new());
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ImportError::NoDataRows);
    }

    Ok(RawTable::new(headers, rows))
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Parse in-memory file contents
    pub fn parse_str(&self, contents: &str) -> ImportResult<RawTable> {
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // row length is normalized in assemble_table
            .delimiter(self.delimiter)
            .from_reader(contents.as_bytes());

        let mut records = reader.records();

        // First non-blank record is the header row
        let header_record: StringRecord = loop {
            match records.next() {
                None => return Err(ImportError::EmptyFile),
                Some(result) => {
                    let record = result?;
                    if !is_blank(record.iter()) {
                        break record;
                    }
                }
            }
        };

        let headers: Vec<String> = header_record
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut raw_rows = Vec::new();
        for result in records {
            let record = result?;
            raw_rows.push(record.iter().map(str::to_string).collect());
        }

        assemble_table(headers, raw_rows)
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if !matches!(ext.as_str(), "csv" | "txt" | "tsv") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let contents = fs::read_to_string(file_path)?;
        self.parse_str(&contents)
    }
}

// ==========================================
// Excel Parser
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>())
            .skip_while(|cells| is_blank(cells.iter().map(String::as_str)));

        let headers: Vec<String> = rows
            .next()
            .ok_or(ImportError::EmptyFile)?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        assemble_table(headers, rows.collect())
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct UniversalFileParser {
    csv: CsvParser,
}

impl UniversalFileParser {
    pub fn new(csv: CsvParser) -> Self {
        Self { csv }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        match file_extension(file_path).as_str() {
            "csv" | "txt" => self.csv.parse_file(file_path),
            "tsv" => CsvParser::with_delimiter(b'\t').parse_file(file_path),
            "xlsx" | "xls" => ExcelParser.parse_file(file_path),
            other => {
                ensure_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}
