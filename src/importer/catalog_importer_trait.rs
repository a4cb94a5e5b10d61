// ==========================================
// Humidor Hub - Importer traits
// ==========================================
// Stage interfaces of the import pipeline (no implementations)
// ==========================================

use crate::domain::import::{ImportRequest, ImportSummary};
use crate::domain::mapping::{ColumnMapping, RawTable};
use crate::domain::record::FieldValue;
use crate::domain::schema::FieldSpec;
use crate::domain::types::{EntityType, ValueType};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

// ==========================================
// CatalogImporter Trait
// ==========================================
// Implementor: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// Import one file into the target collection
    ///
    /// # Arguments
    /// - file_path: .csv / .txt / .tsv / .xlsx / .xls
    /// - request: target collection, humidor, mapping overrides, dry-run flag
    ///
    /// # Returns
    /// - Ok(ImportSummary): accepted / rejected / written counts
    /// - Err: parse error, incomplete mapping, write error
    ///
    /// # Stages
    /// 1. parse into a RawTable
    /// 2. auto-map headers, apply overrides, gate on required fields
    /// 3. coerce rows, inject defaults, reject rows missing required values
    /// 4. commit accepted records in one batch
    async fn import_file(&self, file_path: &Path, request: &ImportRequest)
        -> ImportResult<ImportSummary>;

    /// Parse a file and propose a mapping without importing
    async fn preview_mapping(
        &self,
        file_path: &Path,
        entity_type: EntityType,
    ) -> ImportResult<(RawTable, ColumnMapping)>;
}

// ==========================================
// FileParser Trait
// ==========================================
// Implementors: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// Parse a file into a header row plus string cells
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// Implementor: field_mapper::FieldMapper
pub trait FieldMapper: Send + Sync {
    /// Propose a mapping from header names (exact normalized match only)
    fn propose_mapping(&self, headers: &[String], schema: &[FieldSpec]) -> ColumnMapping;

    /// True iff every required field maps to a column
    fn validate_mapping(&self, mapping: &ColumnMapping, schema: &[FieldSpec]) -> bool {
        self.missing_required(mapping, schema).is_empty()
    }

    /// Required field keys still mapped to Skip
    fn missing_required(&self, mapping: &ColumnMapping, schema: &[FieldSpec])
        -> Vec<&'static str>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// Implementor: data_cleaner::DataCleaner

/// Result of coercing one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(FieldValue),
    /// Fallback value (numeric zero for an empty or non-numeric cell)
    Lenient(FieldValue),
    /// Leave the key out of the record
    Absent,
}

pub trait DataCleaner: Send + Sync {
    /// Trim; empty or whitespace-only becomes None
    fn clean_text(&self, value: &str) -> Option<String>;

    /// Longest leading numeric prefix, None if there is none
    fn parse_number(&self, value: &str) -> Option<f64>;

    /// "true" / "1" (any case, trimmed) are true, everything else false
    fn parse_flag(&self, value: &str) -> bool;

    /// Split on ';', trim items, drop empties
    fn split_list(&self, value: &str) -> Vec<String>;

    fn parse_date(&self, value: &str) -> Option<DateTime<Utc>>;

    /// Coerce a cell (None = missing cell) to the declared value type
    fn coerce(&self, cell: Option<&str>, value_type: ValueType) -> Coerced {
        let raw = cell.unwrap_or("");
        match value_type {
            ValueType::String => match self.clean_text(raw) {
                Some(text) => Coerced::Value(FieldValue::Text(text)),
                None => Coerced::Absent,
            },
            ValueType::Number => match self.parse_number(raw) {
                Some(n) => Coerced::Value(FieldValue::Number(n)),
                None => Coerced::Lenient(FieldValue::Number(0.0)),
            },
            ValueType::Boolean => Coerced::Value(FieldValue::Flag(self.parse_flag(raw))),
            ValueType::StringArray => Coerced::Value(FieldValue::List(self.split_list(raw))),
            ValueType::IsoDate => match self.parse_date(raw) {
                Some(ts) => Coerced::Value(FieldValue::Timestamp(ts)),
                None => Coerced::Absent,
            },
        }
    }
}
