// ==========================================
// Humidor Hub - Import layer
// ==========================================
// Tabular files -> typed catalog records -> document store
// Supports: CSV / TSV / TXT, Excel (.xlsx / .xls)
// ==========================================

pub mod batch_writer;
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod row_coercion;
pub mod session;

// Implementations
pub use batch_writer::BatchWriter;
pub use catalog_importer_impl::CatalogImporterImpl;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use row_coercion::{ImportDefaults, RowCoercer};
pub use session::{ImportSession, ImportStage};

// Trait interfaces
pub use catalog_importer_trait::{CatalogImporter, Coerced, DataCleaner, FieldMapper, FileParser};
