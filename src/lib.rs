// ==========================================
// Humidor Hub - Core library
// ==========================================
// CSV / Excel import and CSV / JSON export for a
// cigar collection catalog, backed by SQLite.
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities, schema, mapping
pub mod domain;

// Repository layer - document store
pub mod repository;

// Import pipeline
pub mod importer;

// Export pipeline
pub mod exporter;

// Import settings
pub mod config;

// Connection setup and schema
pub mod db;

pub mod logging;

// API layer
pub mod api;

// Application state
pub mod app;

pub mod cli;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CatalogRecord, CigarRecord, CollectionHandle, ColumnMapping, EntityType, ExportFormat,
    FieldSpec, FieldValue, HumidorRecord, ImportRequest, ImportSummary, RawTable,
};

pub use importer::{CatalogImporter, CatalogImporterImpl, ImportError, ImportSession};

pub use exporter::CatalogExporter;

pub use api::{ApiError, ConfigApi, ExportApi, ImportApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Humidor Hub";
