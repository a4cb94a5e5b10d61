// ==========================================
// Humidor Hub - Config API
// ==========================================
// Read / update import settings
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::open_store;
use crate::config::config_keys;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
    /// False when the value is the built-in default
    pub is_set: bool,
}

pub struct ConfigApi {
    db_path: String,
}

impl ConfigApi {
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// Every known key with its effective value
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let (_, config) = open_store(&self.db_path)?;
        let effective = config
            .effective_config()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let mut items = Vec::with_capacity(effective.len());
        for (key, value) in effective {
            let is_set = config
                .get_config_value(&key)
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?
                .is_some();
            items.push(ConfigItem { key, value, is_set });
        }
        Ok(items)
    }

    pub fn get_config(&self, key: &str) -> ApiResult<ConfigItem> {
        let default = config_keys::default_for(key)
            .ok_or_else(|| ApiError::InvalidInput(format!("unknown config key: {}", key)))?;

        let (_, config) = open_store(&self.db_path)?;
        let stored = config
            .get_config_value(key)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(ConfigItem {
            key: key.to_string(),
            is_set: stored.is_some(),
            value: stored.unwrap_or_else(|| default.to_string()),
        })
    }

    pub fn set_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let (_, config) = open_store(&self.db_path)?;
        config
            .set_config_value(key, value)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))
    }
}
