// ==========================================
// Humidor Hub - Row coercion engine
// ==========================================
// Per row: coerce mapped cells -> inject defaults
// -> required-field gate -> Accepted | Rejected
// A rejected row never aborts the batch.
// ==========================================

use crate::domain::import::{RejectReason, RowOutcome, RowRejection};
use crate::domain::mapping::{ColumnMapping, RawTable};
use crate::domain::record::{
    truncate_to_millis, CatalogRecord, FieldValue, TypedRecord, HUMIDOR_REF_KEY,
};
use crate::domain::schema::{get_schema, FieldSpec};
use crate::domain::types::EntityType;
use crate::importer::catalog_importer_trait::{Coerced, DataCleaner};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

// ==========================================
// ImportDefaults
// ==========================================
/// Values injected into keys the file left absent
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDefaults {
    pub humidor_id: Option<String>,
    pub cigar_quantity: f64,
    pub humidor_temp: f64,
    pub humidor_humidity: f64,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            humidor_id: None,
            cigar_quantity: 1.0,
            humidor_temp: 70.0,
            humidor_humidity: 70.0,
        }
    }
}

/// A mapped field and the index of its source column
/// (None when the mapped header is not in the table)
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColumn {
    pub spec: &'static FieldSpec,
    pub index: Option<usize>,
}

/// Resolve every non-Skip mapping entry against the table header
pub fn resolve_columns(
    table: &RawTable,
    mapping: &ColumnMapping,
    schema: &'static [FieldSpec],
) -> Vec<ResolvedColumn> {
    schema
        .iter()
        .filter_map(|spec| {
            mapping.column_for(spec.key).map(|column| ResolvedColumn {
                spec,
                index: table.column_index(column),
            })
        })
        .collect()
}

// ==========================================
// RowCoercer
// ==========================================
pub struct RowCoercer {
    entity_type: EntityType,
    cleaner: Box<dyn DataCleaner>,
    defaults: ImportDefaults,
}

impl RowCoercer {
    pub fn new(
        entity_type: EntityType,
        cleaner: Box<dyn DataCleaner>,
        defaults: ImportDefaults,
    ) -> Self {
        Self {
            entity_type,
            cleaner,
            defaults,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Coerce the mapped cells of one row
    pub fn coerce_row(&self, row: &[String], columns: &[ResolvedColumn]) -> TypedRecord {
        let mut record = TypedRecord::new();

        for column in columns {
            let cell = column.index.and_then(|i| row.get(i)).map(String::as_str);
            match self.cleaner.coerce(cell, column.spec.value_type) {
                Coerced::Value(value) => record.insert(column.spec.key, value),
                Coerced::Lenient(value) => record.insert_lenient(column.spec.key, value),
                Coerced::Absent => {}
            }
        }

        record
    }

    /// Fill absent keys with the entity's defaults
    pub fn inject_defaults(&self, record: &mut TypedRecord, now: DateTime<Utc>) {
        match self.entity_type {
            EntityType::Cigar => {
                if let Some(humidor_id) = &self.defaults.humidor_id {
                    record.insert_default(HUMIDOR_REF_KEY, FieldValue::Text(humidor_id.clone()));
                }
                record.insert_default("flavorNotes", FieldValue::List(Vec::new()));
                record.insert_default(
                    "quantity",
                    FieldValue::Number(self.defaults.cigar_quantity),
                );
                record.insert_default("dateAdded", FieldValue::Timestamp(now));
            }
            EntityType::Humidor => {
                record.insert_default("temp", FieldValue::Number(self.defaults.humidor_temp));
                record.insert_default(
                    "humidity",
                    FieldValue::Number(self.defaults.humidor_humidity),
                );
            }
        }
    }

    /// Required keys without a usable value
    ///
    /// Empty text, an empty list, and a lenient numeric zero do not count.
    pub fn missing_required(&self, record: &TypedRecord) -> Vec<String> {
        get_schema(self.entity_type)
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| match record.get(spec.key) {
                None => true,
                Some(value) => value.is_empty() || record.is_lenient(spec.key),
            })
            .map(|spec| spec.key.to_string())
            .collect()
    }

    /// Values present but outside what the record type can hold
    ///
    /// A cigar quantity is a whole, non-negative count. Lenient zeros
    /// are left to the required-field gate.
    pub fn invalid_value(&self, record: &TypedRecord) -> Option<RejectReason> {
        if self.entity_type != EntityType::Cigar || record.is_lenient("quantity") {
            return None;
        }

        let quantity = record.number("quantity")?;
        let reason = if quantity < 0.0 {
            "quantity cannot be negative"
        } else if quantity.fract() != 0.0 {
            "quantity must be a whole number"
        } else if quantity > f64::from(u32::MAX) {
            "quantity is too large"
        } else {
            return None;
        };

        Some(RejectReason::InvalidValue {
            field: "quantity".to_string(),
            reason: format!("{} (got {})", reason, quantity),
        })
    }

    /// Full per-row pipeline
    ///
    /// # Arguments
    /// - row_number: 1-based data row number, reported on rejection
    pub fn process_row(
        &self,
        row_number: usize,
        row: &[String],
        columns: &[ResolvedColumn],
        now: DateTime<Utc>,
    ) -> RowOutcome {
        let mut record = self.coerce_row(row, columns);
        self.inject_defaults(&mut record, now);

        let missing = self.missing_required(&record);
        if !missing.is_empty() {
            warn!(row_number, missing = ?missing, "row rejected");
            return RowOutcome::Rejected(RowRejection {
                row_number,
                reason: RejectReason::MissingRequired { fields: missing },
            });
        }

        if let Some(reason) = self.invalid_value(&record) {
            warn!(row_number, reason = %reason, "row rejected");
            return RowOutcome::Rejected(RowRejection { row_number, reason });
        }

        RowOutcome::Accepted(CatalogRecord::from_typed(self.entity_type, &record))
    }

    /// Run every data row of the table through the pipeline
    pub fn process_table(&self, table: &RawTable, mapping: &ColumnMapping) -> Vec<RowOutcome> {
        let columns = resolve_columns(table, mapping, get_schema(self.entity_type));
        let now = truncate_to_millis(Utc::now());

        debug!(
            entity = %self.entity_type,
            rows = table.row_count(),
            mapped_fields = columns.len(),
            "coercing rows"
        );

        table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.process_row(idx + 1, row, &columns, now))
            .collect()
    }
}
