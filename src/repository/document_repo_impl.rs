// ==========================================
// Humidor Hub - Document store (rusqlite)
// ==========================================
// Table: documents(owner_id, collection, doc_id, body, updated_at)
// Batch writes: one transaction, prepared statement in a loop
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::record::format_timestamp;
use crate::domain::types::CollectionHandle;
use crate::repository::document_repo::{
    CollectionChange, DocumentRepository, NewDocument, StoredDocument,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::debug;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

// ==========================================
// DocumentRepositoryImpl
// ==========================================
pub struct DocumentRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
    changes: broadcast::Sender<CollectionChange>,
}

impl DocumentRepositoryImpl {
    /// Open (and initialize) the store at a database path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Build on an already configured connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { conn, changes }
    }

    fn map_document(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }

    fn decode_document(
        (id, body, updated_at): (String, String, String),
    ) -> RepositoryResult<StoredDocument> {
        let body = serde_json::from_str(&body)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| RepositoryError::SerializationError(format!("updated_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoredDocument {
            id,
            body,
            updated_at,
        })
    }
}

#[async_trait]
impl DocumentRepository for DocumentRepositoryImpl {
    async fn commit_batch(
        &self,
        handle: &CollectionHandle,
        documents: Vec<NewDocument>,
    ) -> RepositoryResult<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let doc_ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();

        let count = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            let tx = conn.unchecked_transaction()?;
            let updated_at = format_timestamp(&Utc::now());

            let mut count = 0;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT OR REPLACE INTO documents (
                        owner_id, collection, doc_id, body, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )?;

                for document in &documents {
                    let body = serde_json::to_string(&document.body)?;
                    stmt.execute(params![
                        handle.owner_id,
                        handle.collection(),
                        document.id,
                        body,
                        updated_at,
                    ])?;
                    count += 1;
                }
            }

            // Dropping an uncommitted transaction rolls it back
            tx.commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
            count
        };

        debug!(collection = %handle, count, "batch committed");
        if self
            .changes
            .send(CollectionChange {
                handle: handle.clone(),
                doc_ids,
            })
            .is_err()
        {
            debug!("no change subscribers");
        }

        Ok(count)
    }

    async fn list_documents(
        &self,
        handle: &CollectionHandle,
    ) -> RepositoryResult<Vec<StoredDocument>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT doc_id, body, updated_at
            FROM documents
            WHERE owner_id = ?1 AND collection = ?2
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map(
            params![handle.owner_id, handle.collection()],
            Self::map_document,
        )?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(Self::decode_document(row?)?);
        }

        Ok(documents)
    }

    async fn get_document(
        &self,
        handle: &CollectionHandle,
        id: &str,
    ) -> RepositoryResult<Option<StoredDocument>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let raw = conn
            .query_row(
                r#"
                SELECT doc_id, body, updated_at
                FROM documents
                WHERE owner_id = ?1 AND collection = ?2 AND doc_id = ?3
                "#,
                params![handle.owner_id, handle.collection(), id],
                Self::map_document,
            )
            .optional()?;

        raw.map(Self::decode_document).transpose()
    }

    async fn count_documents(&self, handle: &CollectionHandle) -> RepositoryResult<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE owner_id = ?1 AND collection = ?2",
            params![handle.owner_id, handle.collection()],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    fn subscribe(&self) -> broadcast::Receiver<CollectionChange> {
        self.changes.subscribe()
    }
}
