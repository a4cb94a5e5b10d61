// ==========================================
// Humidor Hub - Application state
// ==========================================
// Shared API instances for one database
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ConfigApi, ExportApi, ImportApi};

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "HUMIDOR_HUB_DB_PATH";

const DB_FILE_NAME: &str = "humidor_hub.db";

/// All API instances, bound to one database path
pub struct AppState {
    pub db_path: String,
    pub import_api: Arc<ImportApi>,
    pub export_api: Arc<ExportApi>,
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    pub fn new(db_path: String) -> Self {
        tracing::debug!(db_path = %db_path, "app state created");
        Self {
            import_api: Arc::new(ImportApi::new(db_path.clone())),
            export_api: Arc::new(ExportApi::new(db_path.clone())),
            config_api: Arc::new(ConfigApi::new(db_path.clone())),
            db_path,
        }
    }
}

/// Default database path
///
/// 1. $HUMIDOR_HUB_DB_PATH when set and non-empty
/// 2. <user data dir>/humidor-hub/humidor_hub.db (the directory is created)
/// 3. ./humidor_hub.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("humidor-hub");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
