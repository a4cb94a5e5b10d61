// ==========================================
// Humidor Hub - Import config reader trait
// ==========================================
// Read-only settings needed by the import pipeline
// ==========================================

use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Field delimiter of delimited text files
    ///
    /// # Default
    /// - ','
    async fn get_csv_delimiter(&self) -> ConfigResult<u8>;

    /// Quantity of an imported cigar whose quantity field is not mapped
    ///
    /// # Default
    /// - 1
    async fn get_default_cigar_quantity(&self) -> ConfigResult<f64>;

    /// # Default
    /// - 70
    async fn get_default_humidor_temp(&self) -> ConfigResult<f64>;

    /// # Default
    /// - 70
    async fn get_default_humidor_humidity(&self) -> ConfigResult<f64>;
}
