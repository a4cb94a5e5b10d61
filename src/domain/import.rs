// ==========================================
// Humidor Hub - Import outcome model
// ==========================================
// RowOutcome: per-row result of the coercion engine
// ImportSummary: aggregate result of one import attempt
// ==========================================

use crate::domain::record::CatalogRecord;
use crate::domain::types::{CollectionHandle, EntityType};
use serde::Serialize;
use std::fmt;

// ==========================================
// ImportRequest
// ==========================================
/// Manual mapping change applied on top of the proposed mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOverride {
    Assign { key: String, column: String },
    Skip { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub target: CollectionHandle,
    /// Owning humidor injected into imported cigars
    pub humidor_id: Option<String>,
    pub overrides: Vec<MappingOverride>,
    /// Parse, map and coerce, but skip the batch commit
    pub dry_run: bool,
}

impl ImportRequest {
    pub fn new(target: CollectionHandle) -> Self {
        Self {
            target,
            humidor_id: None,
            overrides: Vec::new(),
            dry_run: false,
        }
    }

    pub fn with_humidor(mut self, humidor_id: impl Into<String>) -> Self {
        self.humidor_id = Some(humidor_id.into());
        self
    }

    pub fn with_override(mut self, mapping_override: MappingOverride) -> Self {
        self.overrides.push(mapping_override);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

// ==========================================
// RejectReason / RowRejection
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// Required fields without a usable value after coercion and defaulting
    MissingRequired { fields: Vec<String> },
    /// A value the record type cannot hold, e.g. a fractional cigar count
    InvalidValue { field: String, reason: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingRequired { fields } => {
                write!(f, "missing required field(s): {}", fields.join(", "))
            }
            RejectReason::InvalidValue { field, reason } => {
                write!(f, "invalid value for {}: {}", field, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    /// 1-based data row number (header excluded)
    pub row_number: usize,
    pub reason: RejectReason,
}

// ==========================================
// RowOutcome
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(CatalogRecord),
    Rejected(RowRejection),
}

impl RowOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RowOutcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<CatalogRecord> {
        match self {
            RowOutcome::Accepted(record) => Some(record),
            RowOutcome::Rejected(_) => None,
        }
    }
}

// ==========================================
// ImportSummary
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub entity_type: EntityType,
    /// Data rows read from the file
    pub total_rows: usize,
    /// Rows that passed coercion and the required-field gate
    pub accepted: usize,
    pub rejected: usize,
    /// Documents written by the batch commit
    pub written: usize,
    pub rejections: Vec<RowRejection>,
    pub dry_run: bool,
    pub elapsed_ms: u64,
}
