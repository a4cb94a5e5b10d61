// ==========================================
// Humidor Hub - Import API
// ==========================================
// Entry points for importing a file and previewing
// its proposed mapping
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::open_store;
use crate::domain::import::{ImportRequest, ImportSummary};
use crate::domain::mapping::MappingEntry;
use crate::domain::schema::{get_schema, FieldSpec};
use crate::domain::types::{CollectionHandle, EntityType};
use crate::importer::{CatalogImporter, CatalogImporterImpl, FieldMapper, FieldMapperImpl};
use crate::repository::DocumentRepository;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Proposed mapping of a file, before any import
#[derive(Debug, Clone, Serialize)]
pub struct MappingPreview {
    pub entity_type: EntityType,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub entries: Vec<MappingEntry>,
    pub missing_required: Vec<&'static str>,
    pub valid: bool,
}

pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// Import a file into the requested collection
    ///
    /// # Returns
    /// - Ok(ImportSummary): counts, rejected rows with reasons
    /// - Err(InvalidInput): unknown humidor, bad override, incomplete mapping
    /// - Err(ImportFailed): parse or batch write failure (nothing saved)
    pub async fn import_file(
        &self,
        file_path: &str,
        request: ImportRequest,
    ) -> ApiResult<ImportSummary> {
        if request.target.owner_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("owner id must not be empty".to_string()));
        }

        let (repo, config) = open_store(&self.db_path)?;

        // The target humidor must exist before cigars are attached to it
        if let Some(humidor_id) = &request.humidor_id {
            let humidors = CollectionHandle::new(&request.target.owner_id, EntityType::Humidor);
            if repo.get_document(&humidors, humidor_id).await?.is_none() {
                return Err(ApiError::InvalidInput(format!(
                    "humidor '{}' does not exist for owner '{}'",
                    humidor_id, request.target.owner_id
                )));
            }
        }

        let importer = CatalogImporterImpl::new(repo, config);
        let summary = importer.import_file(Path::new(file_path), &request).await?;

        info!(
            batch_id = %summary.batch_id,
            written = summary.written,
            rejected = summary.rejected,
            "import api finished"
        );
        Ok(summary)
    }

    /// Parse a file and report the mapping the importer would start from
    pub async fn preview_mapping(
        &self,
        file_path: &str,
        entity_type: EntityType,
    ) -> ApiResult<MappingPreview> {
        let (repo, config) = open_store(&self.db_path)?;
        let importer = CatalogImporterImpl::new(repo, config);

        let (table, mapping) = importer
            .preview_mapping(Path::new(file_path), entity_type)
            .await?;

        let schema = get_schema(entity_type);
        let missing_required = FieldMapperImpl.missing_required(&mapping, schema);

        Ok(MappingPreview {
            entity_type,
            row_count: table.row_count(),
            headers: table.headers,
            entries: mapping.entries().to_vec(),
            valid: missing_required.is_empty(),
            missing_required,
        })
    }

    /// Field list of an entity type
    pub fn list_fields(entity_type: EntityType) -> &'static [FieldSpec] {
        get_schema(entity_type)
    }
}
