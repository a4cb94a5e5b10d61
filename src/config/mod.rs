// ==========================================
// Humidor Hub - Config layer
// ==========================================
// Import settings stored in the config_kv table
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ConfigResult, ImportConfigReader};
