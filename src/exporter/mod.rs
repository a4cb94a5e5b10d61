// ==========================================
// Humidor Hub - Export layer
// ==========================================
// Document store -> CSV / JSON
// ==========================================

pub mod error;
pub mod tabular_serializer;

pub use error::{ExportError, ExportResult};
pub use tabular_serializer::{decode_documents, render_cell, serialize_csv, serialize_json};

use crate::domain::cigar::CigarRecord;
use crate::domain::humidor::HumidorRecord;
use crate::domain::record::CatalogEntity;
use crate::domain::types::{CollectionHandle, EntityType, ExportFormat};
use crate::repository::DocumentRepository;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// CatalogExporter
// ==========================================
pub struct CatalogExporter<R>
where
    R: DocumentRepository,
{
    repo: Arc<R>,
    delimiter: u8,
}

impl<R> CatalogExporter<R>
where
    R: DocumentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            delimiter: b',',
        }
    }

    /// CSV field separator (defaults to ',')
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load and decode every document of a collection
    pub async fn load_records<E: CatalogEntity>(&self, owner_id: &str) -> ExportResult<Vec<E>> {
        let handle = CollectionHandle::new(owner_id, E::ENTITY_TYPE);
        let documents = self.repo.list_documents(&handle).await?;
        Ok(decode_documents(documents))
    }

    /// Cigars of an owner whose humidor still exists
    ///
    /// # Arguments
    /// - humidor_id: keep only cigars of this humidor
    pub async fn load_cigars(
        &self,
        owner_id: &str,
        humidor_id: Option<&str>,
    ) -> ExportResult<Vec<CigarRecord>> {
        let humidor_ids: HashSet<String> = self
            .load_records::<HumidorRecord>(owner_id)
            .await?
            .into_iter()
            .filter_map(|h| h.id)
            .collect();

        let cigars = self.load_records::<CigarRecord>(owner_id).await?;
        let total = cigars.len();

        let cigars: Vec<CigarRecord> = cigars
            .into_iter()
            .filter(|c| humidor_ids.contains(&c.humidor_id))
            .filter(|c| humidor_id.map_or(true, |wanted| c.humidor_id == wanted))
            .collect();

        let orphans = total - cigars.len();
        if orphans > 0 && humidor_id.is_none() {
            warn!(owner_id, orphans, "cigars without an existing humidor left out");
        }

        Ok(cigars)
    }

    /// Render a collection in the requested format
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        owner_id: &str,
        entity_type: EntityType,
        format: ExportFormat,
        humidor_id: Option<&str>,
    ) -> ExportResult<String> {
        let (count, output) = match entity_type {
            EntityType::Cigar => {
                let cigars = self.load_cigars(owner_id, humidor_id).await?;
                (cigars.len(), render(&cigars, format, self.delimiter)?)
            }
            EntityType::Humidor => {
                let humidors = self.load_records::<HumidorRecord>(owner_id).await?;
                (humidors.len(), render(&humidors, format, self.delimiter)?)
            }
        };

        info!(records = count, "export rendered");
        Ok(output)
    }
}

fn render<E: CatalogEntity>(
    records: &[E],
    format: ExportFormat,
    delimiter: u8,
) -> ExportResult<String> {
    match format {
        ExportFormat::Csv => serialize_csv(records, delimiter),
        ExportFormat::Json => serialize_json(records),
    }
}
