// ==========================================
// Humidor Hub - Export API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::open_store;
use crate::config::ImportConfigReader;
use crate::domain::types::{EntityType, ExportFormat};
use crate::exporter::CatalogExporter;
use std::fs;
use std::path::Path;
use tracing::info;

pub struct ExportApi {
    db_path: String,
}

impl ExportApi {
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// Render an owner's collection
    ///
    /// CSV output uses the configured csv_delimiter, so an export
    /// imports back under the same settings.
    ///
    /// # Arguments
    /// - humidor_id: cigar exports only, limits output to one humidor
    pub async fn export(
        &self,
        owner_id: &str,
        entity_type: EntityType,
        format: ExportFormat,
        humidor_id: Option<&str>,
    ) -> ApiResult<String> {
        if owner_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("owner id must not be empty".to_string()));
        }
        if humidor_id.is_some() && entity_type == EntityType::Humidor {
            return Err(ApiError::InvalidInput(
                "a humidor filter only applies to cigar exports".to_string(),
            ));
        }

        let (repo, config) = open_store(&self.db_path)?;
        let delimiter = config
            .get_csv_delimiter()
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let exporter = CatalogExporter::new(repo).with_delimiter(delimiter);

        Ok(exporter
            .export(owner_id, entity_type, format, humidor_id)
            .await?)
    }

    /// Render and write to a file
    ///
    /// # Returns
    /// - Ok(usize): bytes written
    pub async fn export_to_file(
        &self,
        output_path: &Path,
        owner_id: &str,
        entity_type: EntityType,
        format: ExportFormat,
        humidor_id: Option<&str>,
    ) -> ApiResult<usize> {
        let rendered = self
            .export(owner_id, entity_type, format, humidor_id)
            .await?;

        fs::write(output_path, &rendered).map_err(|e| {
            ApiError::ExportFailed(format!("cannot write {}: {}", output_path.display(), e))
        })?;

        info!(path = %output_path.display(), bytes = rendered.len(), "export written");
        Ok(rendered.len())
    }
}
