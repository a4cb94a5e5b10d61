// ==========================================
// Humidor Hub - Raw table and column mapping
// ==========================================
// RawTable: parser output (header + string cells)
// ColumnMapping: field key -> source column | Skip
// ==========================================

use crate::domain::schema::FieldSpec;
use serde::Serialize;
use std::fmt;

// ==========================================
// RawTable
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Every row has exactly `headers.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first column with this header (first-match-wins on duplicates)
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_header(&self, header: &str) -> bool {
        self.column_index(header).is_some()
    }
}

// ==========================================
// MappingTarget
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum MappingTarget {
    Column(String),
    /// Sentinel: do not import this field
    Skip,
}

impl MappingTarget {
    pub fn column(&self) -> Option<&str> {
        match self {
            MappingTarget::Column(name) => Some(name),
            MappingTarget::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, MappingTarget::Skip)
    }
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingTarget::Column(name) => write!(f, "{}", name),
            MappingTarget::Skip => write!(f, "(do not import)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub key: &'static str,
    pub target: MappingTarget,
}

// ==========================================
// ColumnMapping
// ==========================================
// Holds one entry per schema field, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    /// Every field mapped to Skip
    pub fn unmapped(schema: &[FieldSpec]) -> Self {
        Self {
            entries: schema
                .iter()
                .map(|spec| MappingEntry {
                    key: spec.key,
                    target: MappingTarget::Skip,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn target(&self, key: &str) -> Option<&MappingTarget> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.target)
    }

    /// Source column of a field, None when skipped or unknown
    pub fn column_for(&self, key: &str) -> Option<&str> {
        self.target(key).and_then(MappingTarget::column)
    }

    /// Map a field to a source column. Returns false for an unknown key.
    pub fn assign(&mut self, key: &str, column: impl Into<String>) -> bool {
        self.set_target(key, MappingTarget::Column(column.into()))
    }

    /// Map a field to the Skip sentinel. Returns false for an unknown key.
    pub fn skip(&mut self, key: &str) -> bool {
        self.set_target(key, MappingTarget::Skip)
    }

    fn set_target(&mut self, key: &str, target: MappingTarget) -> bool {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.target = target;
                true
            }
            None => false,
        }
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.target.is_skip()).count()
    }
}
