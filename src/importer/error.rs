// ==========================================
// Humidor Hub - Import error types
// ==========================================
// Tool: thiserror derive
// Parse and write errors end the current attempt;
// row rejections are not errors (see RowOutcome).
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    FileReadError(String),

    // ===== Parse errors =====
    #[error("CSV parse error: {0}")]
    CsvParseError(String),

    #[error("Excel parse error: {0}")]
    ExcelParseError(String),

    #[error("file has no header row")]
    EmptyFile,

    #[error("file has a header row but no data rows")]
    NoDataRows,

    // ===== Mapping / flow errors =====
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("column '{0}' is not present in the file header")]
    UnknownColumn(String),

    #[error("required field(s) not mapped: {}", missing.join(", "))]
    IncompleteMapping { missing: Vec<String> },

    #[error("cigar imports need a target humidor")]
    MissingHumidor,

    #[error("invalid import transition: from={from} to={to}")]
    InvalidTransition { from: String, to: String },

    // ===== Write errors =====
    #[error("batch write failed, nothing was saved: {0}")]
    WriteError(String),

    // ===== Config errors =====
    #[error("failed to read config (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// ParseError family: the flow cannot leave file selection
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ImportError::CsvParseError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::EmptyFile
                | ImportError::NoDataRows
        )
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
