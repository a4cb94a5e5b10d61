// ==========================================
// Humidor Hub - Document store trait
// ==========================================
// Opaque document store: per-collection listing,
// atomic batch writes and change notifications.
// No business rules here, only document CRUD.
// ==========================================

use crate::domain::types::CollectionHandle;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Document to be written (id assigned by the caller)
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub id: String,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
    pub id: String,
    pub body: Value,
    pub updated_at: DateTime<Utc>,
}

/// Emitted after a batch has been committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChange {
    pub handle: CollectionHandle,
    pub doc_ids: Vec<String>,
}

// ==========================================
// DocumentRepository Trait
// ==========================================
// Implementor: DocumentRepositoryImpl (rusqlite)
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Write all documents in one transaction (INSERT OR REPLACE)
    ///
    /// # Returns
    /// - Ok(usize): documents written
    /// - Err: nothing was written (the transaction is rolled back)
    async fn commit_batch(
        &self,
        handle: &CollectionHandle,
        documents: Vec<NewDocument>,
    ) -> RepositoryResult<usize>;

    /// All documents of a collection, oldest write first
    async fn list_documents(&self, handle: &CollectionHandle)
        -> RepositoryResult<Vec<StoredDocument>>;

    async fn get_document(
        &self,
        handle: &CollectionHandle,
        id: &str,
    ) -> RepositoryResult<Option<StoredDocument>>;

    async fn count_documents(&self, handle: &CollectionHandle) -> RepositoryResult<usize>;

    /// Change feed; receivers only see batches committed after subscribing
    fn subscribe(&self) -> broadcast::Receiver<CollectionChange>;
}
