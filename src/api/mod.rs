// ==========================================
// Humidor Hub - API layer
// ==========================================
// DB-path based entry points used by the CLI
// ==========================================

pub mod config_api;
pub mod error;
pub mod export_api;
pub mod import_api;

pub use config_api::{ConfigApi, ConfigItem};
pub use error::{ApiError, ApiResult};
pub use export_api::ExportApi;
pub use import_api::{ImportApi, MappingPreview};

use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::DocumentRepositoryImpl;
use std::sync::{Arc, Mutex};

/// Open the database once and share the connection between
/// the document store and the config manager
pub(crate) fn open_store(db_path: &str) -> ApiResult<(Arc<DocumentRepositoryImpl>, ConfigManager)> {
    let conn = open_sqlite_connection(db_path)
        .map_err(|e| ApiError::DatabaseError(format!("cannot open {}: {}", db_path, e)))?;
    init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let conn = Arc::new(Mutex::new(conn));
    let config = ConfigManager::from_connection(conn.clone())
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let repo = Arc::new(DocumentRepositoryImpl::from_connection(conn));

    Ok((repo, config))
}
