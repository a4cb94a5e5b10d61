// ==========================================
// Humidor Hub - Config manager
// ==========================================
// Storage: config_kv table (scope_id='global')
// Values are stored as text; absent keys fall back
// to the defaults in config_keys.
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const CSV_DELIMITER: &str = "csv_delimiter";
    pub const DEFAULT_CIGAR_QUANTITY: &str = "default_cigar_quantity";
    pub const DEFAULT_HUMIDOR_TEMP: &str = "default_humidor_temp";
    pub const DEFAULT_HUMIDOR_HUMIDITY: &str = "default_humidor_humidity";

    /// Every known key with its default value
    pub const DEFAULTS: [(&str, &str); 4] = [
        (CSV_DELIMITER, ","),
        (DEFAULT_CIGAR_QUANTITY, "1"),
        (DEFAULT_HUMIDOR_TEMP, "70"),
        (DEFAULT_HUMIDOR_HUMIDITY, "70"),
    ];

    pub fn default_for(key: &str) -> Option<&'static str> {
        DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// "tab" or a single ASCII character
fn parse_delimiter(value: &str) -> ConfigResult<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => Err(format!("csv_delimiter must be a single ASCII character, got '{}'", other).into()),
    }
}

fn parse_number(key: &str, value: &str) -> ConfigResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("{} must be a number, got '{}'", key, value).into())
}

/// Default stock count: a whole number of at least 1
fn parse_quantity(key: &str, value: &str) -> ConfigResult<f64> {
    let n = parse_number(key, value)?;
    if n < 1.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(format!("{} must be a whole number >= 1, got '{}'", key, value).into());
    }
    Ok(n)
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open the config store at a database path
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (PRAGMAs are re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("failed to acquire lock: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// Read a global value
    ///
    /// # Returns
    /// - Some(String): stored value
    /// - None: key not set
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("failed to acquire lock: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn get_config_or_default(&self, key: &str) -> ConfigResult<String> {
        let default = config_keys::default_for(key).unwrap_or("");
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Write a global value after validating it
    ///
    /// Unknown keys and values of the wrong shape are refused.
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            config_keys::CSV_DELIMITER => {
                parse_delimiter(value)?;
            }
            config_keys::DEFAULT_CIGAR_QUANTITY => {
                parse_quantity(key, value)?;
            }
            config_keys::DEFAULT_HUMIDOR_TEMP | config_keys::DEFAULT_HUMIDOR_HUMIDITY => {
                parse_number(key, value)?;
            }
            other => return Err(format!("unknown config key: {}", other).into()),
        }

        let conn = self.conn.lock().map_err(|e| format!("failed to acquire lock: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// Effective settings: stored values over defaults
    pub fn effective_config(&self) -> ConfigResult<BTreeMap<String, String>> {
        let mut config: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.conn.lock().map_err(|e| format!("failed to acquire lock: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config.insert(key, value);
        }

        Ok(config)
    }

    /// Effective settings as a JSON string
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config = self.effective_config()?;
        Ok(serde_json::to_string(&json!(config))?)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_csv_delimiter(&self) -> ConfigResult<u8> {
        parse_delimiter(&self.get_config_or_default(config_keys::CSV_DELIMITER)?)
    }

    async fn get_default_cigar_quantity(&self) -> ConfigResult<f64> {
        let key = config_keys::DEFAULT_CIGAR_QUANTITY;
        parse_quantity(key, &self.get_config_or_default(key)?)
    }

    async fn get_default_humidor_temp(&self) -> ConfigResult<f64> {
        let key = config_keys::DEFAULT_HUMIDOR_TEMP;
        parse_number(key, &self.get_config_or_default(key)?)
    }

    async fn get_default_humidor_humidity(&self) -> ConfigResult<f64> {
        let key = config_keys::DEFAULT_HUMIDOR_HUMIDITY;
        parse_number(key, &self.get_config_or_default(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), b',');
        assert_eq!(config.get_default_cigar_quantity().await.unwrap(), 1.0);
        assert_eq!(config.get_default_humidor_temp().await.unwrap(), 70.0);
        assert_eq!(config.get_default_humidor_humidity().await.unwrap(), 70.0);
    }

    #[tokio::test]
    async fn test_set_and_read_back() {
        let config = manager();
        config.set_config_value(config_keys::CSV_DELIMITER, ";").unwrap();
        config.set_config_value(config_keys::DEFAULT_HUMIDOR_TEMP, "68").unwrap();
        config.set_config_value(config_keys::DEFAULT_HUMIDOR_TEMP, "66.5").unwrap();

        assert_eq!(config.get_csv_delimiter().await.unwrap(), b';');
        assert_eq!(config.get_default_humidor_temp().await.unwrap(), 66.5);
    }

    #[test]
    fn test_invalid_values_refused() {
        let config = manager();
        assert!(config.set_config_value("theme", "dark").is_err());
        assert!(config.set_config_value(config_keys::CSV_DELIMITER, ";;").is_err());
        assert!(config
            .set_config_value(config_keys::DEFAULT_CIGAR_QUANTITY, "many")
            .is_err());
        assert_eq!(config.get_config_value(config_keys::CSV_DELIMITER).unwrap(), None);
    }

    #[tokio::test]
    async fn test_default_quantity_must_be_whole_and_positive() {
        let config = manager();
        for bad in ["0", "-2", "1.5"] {
            assert!(
                config
                    .set_config_value(config_keys::DEFAULT_CIGAR_QUANTITY, bad)
                    .is_err(),
                "'{}' accepted",
                bad
            );
        }
        assert_eq!(
            config.get_config_value(config_keys::DEFAULT_CIGAR_QUANTITY).unwrap(),
            None
        );

        config
            .set_config_value(config_keys::DEFAULT_CIGAR_QUANTITY, "12")
            .unwrap();
        assert_eq!(config.get_default_cigar_quantity().await.unwrap(), 12.0);
    }

    #[test]
    fn test_snapshot_merges_defaults() {
        let config = manager();
        config.set_config_value(config_keys::CSV_DELIMITER, "tab").unwrap();

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[config_keys::CSV_DELIMITER], "tab");
        assert_eq!(snapshot[config_keys::DEFAULT_HUMIDOR_HUMIDITY], "70");
    }
}
