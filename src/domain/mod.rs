// ==========================================
// Humidor Hub - Domain layer
// ==========================================
// Entities, schema registry, mapping and outcome types.
// No storage access, no pipeline logic.
// ==========================================

pub mod cigar;
pub mod humidor;
pub mod import;
pub mod mapping;
pub mod record;
pub mod schema;
pub mod types;

pub use cigar::CigarRecord;
pub use humidor::HumidorRecord;
pub use import::{
    ImportRequest, ImportSummary, MappingOverride, RejectReason, RowOutcome, RowRejection,
};
pub use mapping::{ColumnMapping, MappingEntry, MappingTarget, RawTable};
pub use record::{CatalogEntity, CatalogRecord, FieldValue, TypedRecord};
pub use schema::{export_headers, get_schema, FieldSpec};
pub use types::{CollectionHandle, EntityType, ExportFormat, ValueType};
