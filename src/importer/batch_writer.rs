// ==========================================
// Humidor Hub - Batch writer
// ==========================================
// All accepted records of one import go to the store
// in a single atomic batch. No retries.
// ==========================================

use crate::domain::record::CatalogRecord;
use crate::domain::types::CollectionHandle;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{DocumentRepository, NewDocument};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub struct BatchWriter<R>
where
    R: DocumentRepository,
{
    repo: Arc<R>,
}

impl<R> BatchWriter<R>
where
    R: DocumentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Serialize records and assign document ids (uuid v4 unless already set)
    pub fn to_documents(
        records: Vec<CatalogRecord>,
        target: &CollectionHandle,
    ) -> ImportResult<Vec<NewDocument>> {
        records
            .into_iter()
            .map(|mut record| {
                if record.entity_type() != target.entity_type {
                    return Err(ImportError::WriteError(format!(
                        "{} record cannot be written to {}",
                        record.entity_type(),
                        target
                    )));
                }

                let id = match record.id() {
                    Some(id) => id.to_string(),
                    None => {
                        let id = Uuid::new_v4().to_string();
                        record.set_id(id.clone());
                        id
                    }
                };

                let body = record
                    .to_document_body()
                    .map_err(|e| ImportError::WriteError(e.to_string()))?;

                Ok(NewDocument { id, body })
            })
            .collect()
    }

    /// Commit all records in one batch
    ///
    /// # Returns
    /// - Ok(usize): documents written (0 for empty input, nothing is sent)
    /// - Err(WriteError): the batch was rejected and nothing was saved
    pub async fn commit(
        &self,
        records: Vec<CatalogRecord>,
        target: &CollectionHandle,
    ) -> ImportResult<usize> {
        if records.is_empty() {
            info!(collection = %target, "nothing to commit");
            return Ok(0);
        }

        let documents = Self::to_documents(records, target)?;
        let attempted = documents.len();

        let written = self
            .repo
            .commit_batch(target, documents)
            .await
            .map_err(|e| {
                error!(collection = %target, attempted, error = %e, "batch commit failed");
                ImportError::WriteError(e.to_string())
            })?;

        info!(collection = %target, written, "batch committed");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{FieldValue, TypedRecord};
    use crate::domain::types::EntityType;
    use crate::repository::DocumentRepositoryImpl;

    fn humidor(name: &str) -> CatalogRecord {
        let mut record = TypedRecord::new();
        record.insert("name", FieldValue::Text(name.into()));
        record.insert("temp", FieldValue::Number(70.0));
        record.insert("humidity", FieldValue::Number(70.0));
        CatalogRecord::from_typed(EntityType::Humidor, &record)
    }

    #[test]
    fn test_ids_assigned_and_kept_out_of_body() {
        let target = CollectionHandle::new("u1", EntityType::Humidor);
        let docs = BatchWriter::<DocumentRepositoryImpl>::to_documents(
            vec![humidor("Desktop"), humidor("Cabinet")],
            &target,
        )
        .unwrap();

        assert_eq!(docs.len(), 2);
        assert_ne!(docs[0].id, docs[1].id);
        assert!(Uuid::parse_str(&docs[0].id).is_ok());
        assert!(docs[0].body.get("id").is_none());
        assert_eq!(docs[1].body["name"], "Cabinet");
    }

    #[test]
    fn test_entity_mismatch_is_write_error() {
        let target = CollectionHandle::new("u1", EntityType::Cigar);
        let result =
            BatchWriter::<DocumentRepositoryImpl>::to_documents(vec![humidor("Desktop")], &target);
        assert!(matches!(result, Err(ImportError::WriteError(_))));
    }
}
