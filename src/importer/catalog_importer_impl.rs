// ==========================================
// Humidor Hub - Catalog importer
// ==========================================
// Flow: parse -> map (auto + overrides) -> required gate
//       -> coerce rows -> batch commit -> summary
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportRequest, ImportSummary, MappingOverride, RowOutcome};
use crate::domain::mapping::{ColumnMapping, RawTable};
use crate::domain::schema::get_schema;
use crate::domain::types::EntityType;
use crate::importer::batch_writer::BatchWriter;
use crate::importer::catalog_importer_trait::{CatalogImporter, FieldMapper, FileParser};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as HeaderMapper;
use crate::importer::file_parser::{CsvParser, UniversalFileParser};
use crate::importer::row_coercion::{ImportDefaults, RowCoercer};
use crate::importer::session::ImportSession;
use crate::repository::DocumentRepository;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

fn config_error(key: &str, err: impl std::fmt::Display) -> ImportError {
    ImportError::ConfigReadError {
        key: key.to_string(),
        message: err.to_string(),
    }
}

// ==========================================
// CatalogImporterImpl
// ==========================================
pub struct CatalogImporterImpl<R, C>
where
    R: DocumentRepository,
    C: ImportConfigReader,
{
    config: C,
    field_mapper: Box<dyn FieldMapper>,
    writer: BatchWriter<R>,
}

impl<R, C> CatalogImporterImpl<R, C>
where
    R: DocumentRepository,
    C: ImportConfigReader,
{
    /// # Arguments
    /// - repo: document store receiving the batch
    /// - config: import settings (delimiter, defaults)
    pub fn new(repo: Arc<R>, config: C) -> Self {
        Self {
            config,
            field_mapper: Box::new(HeaderMapper),
            writer: BatchWriter::new(repo),
        }
    }

    async fn build_parser(&self) -> ImportResult<UniversalFileParser> {
        let delimiter = self
            .config
            .get_csv_delimiter()
            .await
            .map_err(|e| config_error("csv_delimiter", e))?;
        Ok(UniversalFileParser::new(CsvParser::with_delimiter(delimiter)))
    }

    async fn load_defaults(&self, humidor_id: Option<String>) -> ImportResult<ImportDefaults> {
        Ok(ImportDefaults {
            humidor_id,
            cigar_quantity: self
                .config
                .get_default_cigar_quantity()
                .await
                .map_err(|e| config_error("default_cigar_quantity", e))?,
            humidor_temp: self
                .config
                .get_default_humidor_temp()
                .await
                .map_err(|e| config_error("default_humidor_temp", e))?,
            humidor_humidity: self
                .config
                .get_default_humidor_humidity()
                .await
                .map_err(|e| config_error("default_humidor_humidity", e))?,
        })
    }

    fn apply_overrides(session: &mut ImportSession, overrides: &[MappingOverride]) -> ImportResult<()> {
        for mapping_override in overrides {
            match mapping_override {
                MappingOverride::Assign { key, column } => session.assign(key, column)?,
                MappingOverride::Skip { key } => session.skip(key)?,
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R, C> CatalogImporter for CatalogImporterImpl<R, C>
where
    R: DocumentRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path, request), fields(collection = %request.target))]
    async fn import_file(
        &self,
        file_path: &Path,
        request: &ImportRequest,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let entity_type = request.target.entity_type;
        info!(batch_id = %batch_id, file = %file_path.display(), dry_run = request.dry_run, "import started");

        if entity_type == EntityType::Cigar && request.humidor_id.is_none() {
            return Err(ImportError::MissingHumidor);
        }

        // === Stage 1: parse ===
        let parser = self.build_parser().await?;
        let table = parser.parse_file(file_path).map_err(|e| {
            error!(error = %e, "file parse failed");
            e
        })?;
        let total_rows = table.row_count();
        debug!(total_rows, headers = ?table.headers, "file parsed");

        // === Stage 2: mapping ===
        let mut session = ImportSession::new(entity_type);
        session.load_table(table)?;
        Self::apply_overrides(&mut session, &request.overrides)?;
        session.begin_import().map_err(|e| {
            warn!(error = %e, "mapping incomplete");
            e
        })?;

        // === Stage 3: coercion ===
        let defaults = self.load_defaults(request.humidor_id.clone()).await?;
        let coercer = RowCoercer::new(entity_type, Box::new(DataCleaner), defaults);
        let outcomes = match (session.table(), session.mapping()) {
            (Some(table), Some(mapping)) => coercer.process_table(table, mapping),
            _ => Vec::new(),
        };

        let mut accepted = Vec::new();
        let mut rejections = Vec::new();
        for outcome in outcomes {
            match outcome {
                RowOutcome::Accepted(record) => accepted.push(record),
                RowOutcome::Rejected(rejection) => rejections.push(rejection),
            }
        }
        let accepted_count = accepted.len();
        info!(accepted = accepted_count, rejected = rejections.len(), "rows coerced");

        // === Stage 4: batch commit ===
        let written = if request.dry_run {
            info!("dry run, batch commit skipped");
            0
        } else {
            match self.writer.commit(accepted, &request.target).await {
                Ok(written) => written,
                Err(e) => {
                    session.fail()?;
                    return Err(e);
                }
            }
        };

        let summary = ImportSummary {
            batch_id,
            entity_type,
            total_rows,
            accepted: accepted_count,
            rejected: rejections.len(),
            written,
            rejections,
            dry_run: request.dry_run,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        session.finish(summary.clone())?;

        info!(
            batch_id = %summary.batch_id,
            written = summary.written,
            rejected = summary.rejected,
            elapsed_ms = summary.elapsed_ms,
            "import finished"
        );
        Ok(summary)
    }

    async fn preview_mapping(
        &self,
        file_path: &Path,
        entity_type: EntityType,
    ) -> ImportResult<(RawTable, ColumnMapping)> {
        let table = self.build_parser().await?.parse_file(file_path)?;
        let mapping = self
            .field_mapper
            .propose_mapping(&table.headers, get_schema(entity_type));
        Ok((table, mapping))
    }
}
