// ==========================================
// Test helpers
// ==========================================
// Temp databases, temp CSV files and seeded documents
// ==========================================

#![allow(dead_code)]

use humidor_hub::db::{init_schema, open_sqlite_connection};
use humidor_hub::domain::{CollectionHandle, EntityType};
use humidor_hub::repository::{DocumentRepository, DocumentRepositoryImpl, NewDocument};
use serde_json::{json, Value};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Create a temp database with the schema applied
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// Path of a file under tests/fixtures
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write `content` to a temp file ending in `suffix` (e.g. ".csv")
pub fn write_temp_file(content: &str, suffix: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Store a humidor document directly and return its id
pub async fn seed_humidor(db_path: &str, owner_id: &str, name: &str) -> Result<String, Box<dyn Error>> {
    let id = format!("humidor-{}", name.to_lowercase().replace(' ', "-"));
    let body = json!({ "name": name, "temp": 68.0, "humidity": 69.0 });
    seed_documents(db_path, owner_id, EntityType::Humidor, vec![(id.clone(), body)]).await?;
    Ok(id)
}

/// Store raw document bodies in one batch
pub async fn seed_documents(
    db_path: &str,
    owner_id: &str,
    entity_type: EntityType,
    documents: Vec<(String, Value)>,
) -> Result<usize, Box<dyn Error>> {
    let repo = DocumentRepositoryImpl::new(db_path)?;
    let handle = CollectionHandle::new(owner_id, entity_type);
    let documents = documents
        .into_iter()
        .map(|(id, body)| NewDocument { id, body })
        .collect();

    Ok(repo.commit_batch(&handle, documents).await?)
}

/// Bodies of every stored document of a collection, oldest first
pub async fn stored_bodies(
    db_path: &str,
    owner_id: &str,
    entity_type: EntityType,
) -> Result<Vec<Value>, Box<dyn Error>> {
    let repo = DocumentRepositoryImpl::new(db_path)?;
    let handle = CollectionHandle::new(owner_id, entity_type);

    Ok(repo
        .list_documents(&handle)
        .await?
        .into_iter()
        .map(|doc| doc.body)
        .collect())
}

/// Cigar document body in the persisted shape
pub fn cigar_body(name: &str, brand: &str, quantity: u32, humidor_id: &str) -> Value {
    json!({
        "name": name,
        "brand": brand,
        "quantity": quantity,
        "flavorNotes": [],
        "dateAdded": "2024-03-01T12:00:00Z",
        "humidorId": humidor_id,
    })
}
