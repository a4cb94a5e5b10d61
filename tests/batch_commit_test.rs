// ==========================================
// Batch commit tests
// ==========================================
// A failing write inside a batch must leave the
// collection untouched; committed batches are announced
// on the change feed.
// ==========================================

mod test_helpers;

use humidor_hub::api::{ApiError, ImportApi};
use humidor_hub::domain::{CollectionHandle, EntityType, ImportRequest};
use humidor_hub::importer::{CatalogImporter, CatalogImporterImpl, ImportError};
use humidor_hub::config::ConfigManager;
use humidor_hub::repository::{DocumentRepository, DocumentRepositoryImpl};
use rusqlite::Connection;
use std::sync::Arc;
use test_helpers::{create_test_db, stored_bodies, write_temp_file};

/// Abort any insert of a document named "boom"
fn install_failing_trigger(db_path: &str) {
    let conn = Connection::open(db_path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TRIGGER reject_boom BEFORE INSERT ON documents
        WHEN json_extract(NEW.body, '$.name') = 'boom'
        BEGIN
            SELECT RAISE(ABORT, 'boom');
        END;
        "#,
    )
    .unwrap();
}

#[tokio::test]
async fn test_failed_batch_writes_nothing() {
    humidor_hub::logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    install_failing_trigger(&db_path);

    let file = write_temp_file("Name,Location\nFirst,Office\nboom,Garage\nThird,Cellar\n", ".csv")
        .unwrap();

    let result = ImportApi::new(db_path.clone())
        .import_file(
            &file.path().to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor)),
        )
        .await;

    match result {
        Err(ApiError::ImportFailed(message)) => assert!(message.contains("nothing was saved")),
        other => panic!("expected a failed batch, got {:?}", other),
    }
    assert!(stored_bodies(&db_path, "u1", EntityType::Humidor).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_importer_reports_write_error() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    install_failing_trigger(&db_path);

    let repo = Arc::new(DocumentRepositoryImpl::new(&db_path).unwrap());
    let config = ConfigManager::new(&db_path).unwrap();
    let importer = CatalogImporterImpl::new(repo.clone(), config);

    let file = write_temp_file("Name\nboom\n", ".csv").unwrap();
    let request = ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor));

    let err = importer.import_file(file.path(), &request).await.unwrap_err();
    assert!(matches!(err, ImportError::WriteError(_)));

    let handle = CollectionHandle::new("u1", EntityType::Humidor);
    assert_eq!(repo.count_documents(&handle).await.unwrap(), 0);
}

#[tokio::test]
async fn test_committed_batch_is_announced() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let repo = Arc::new(DocumentRepositoryImpl::new(&db_path).unwrap());
    let mut changes = repo.subscribe();
    let importer = CatalogImporterImpl::new(repo.clone(), ConfigManager::new(&db_path).unwrap());

    let file = write_temp_file("Name,Temperature\nDesk,66\nCabinet,68\n", ".csv").unwrap();
    let handle = CollectionHandle::new("u1", EntityType::Humidor);
    let summary = importer
        .import_file(file.path(), &ImportRequest::new(handle.clone()))
        .await
        .unwrap();
    assert_eq!(summary.written, 2);

    let change = changes.try_recv().unwrap();
    assert_eq!(change.handle, handle);
    assert_eq!(change.doc_ids.len(), 2);

    // Temperature was mapped through its label
    let bodies = stored_bodies(&db_path, "u1", EntityType::Humidor).await.unwrap();
    assert_eq!(bodies[0]["temp"], 66.0);
    assert_eq!(bodies[1]["humidity"], 70.0);
}

#[tokio::test]
async fn test_reimport_adds_new_documents() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());
    let file = write_temp_file("Name\nDesk\n", ".csv").unwrap();
    let path = file.path().to_string_lossy().to_string();
    let request = || ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor));

    api.import_file(&path, request()).await.unwrap();
    api.import_file(&path, request()).await.unwrap();

    // No dedup: every import mints fresh ids
    assert_eq!(stored_bodies(&db_path, "u1", EntityType::Humidor).await.unwrap().len(), 2);
}
