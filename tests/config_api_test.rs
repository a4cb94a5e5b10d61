// ==========================================
// ConfigApi tests
// ==========================================
// Scope:
// 1. list / get with built-in defaults
// 2. validated updates
// 3. settings picked up by the import and export pipelines
// ==========================================

mod test_helpers;

use humidor_hub::api::{ApiError, ConfigApi, ExportApi, ImportApi};
use humidor_hub::config::config_keys;
use humidor_hub::domain::{CollectionHandle, EntityType, ExportFormat, ImportRequest};
use test_helpers::{create_test_db, fixture, seed_humidor, stored_bodies, write_temp_file};

#[test]
fn test_list_configs_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(db_path);

    let items = api.list_configs().unwrap();
    assert_eq!(items.len(), config_keys::DEFAULTS.len());
    assert!(items.iter().all(|item| !item.is_set));

    let quantity = items
        .iter()
        .find(|item| item.key == config_keys::DEFAULT_CIGAR_QUANTITY)
        .unwrap();
    assert_eq!(quantity.value, "1");
}

#[test]
fn test_set_then_get() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(db_path);

    api.set_config(config_keys::DEFAULT_HUMIDOR_TEMP, "65").unwrap();

    let item = api.get_config(config_keys::DEFAULT_HUMIDOR_TEMP).unwrap();
    assert_eq!(item.value, "65");
    assert!(item.is_set);

    let untouched = api.get_config(config_keys::DEFAULT_HUMIDOR_HUMIDITY).unwrap();
    assert_eq!(untouched.value, "70");
    assert!(!untouched.is_set);
}

#[test]
fn test_invalid_updates_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(db_path);

    assert!(matches!(
        api.set_config(config_keys::DEFAULT_CIGAR_QUANTITY, "a few"),
        Err(ApiError::InvalidInput(_))
    ));
    for quantity in ["0", "-2", "2.5"] {
        assert!(matches!(
            api.set_config(config_keys::DEFAULT_CIGAR_QUANTITY, quantity),
            Err(ApiError::InvalidInput(_))
        ));
    }
    assert_eq!(api.get_config(config_keys::DEFAULT_CIGAR_QUANTITY).unwrap().value, "1");
    assert!(matches!(
        api.set_config(config_keys::CSV_DELIMITER, "::"),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.set_config("theme", "dark"),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(api.get_config("theme"), Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_import_uses_configured_settings() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_api = ConfigApi::new(db_path.clone());
    config_api.set_config(config_keys::CSV_DELIMITER, ";").unwrap();
    config_api.set_config(config_keys::DEFAULT_HUMIDOR_TEMP, "64").unwrap();

    let import_api = ImportApi::new(db_path.clone());
    let summary = import_api
        .import_file(
            &fixture("humidors_semicolon.csv").to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor)),
        )
        .await
        .unwrap();
    assert_eq!(summary.written, 1);

    let no_temp = write_temp_file("Name;Location\nTravel;Car\n", ".csv").unwrap();
    import_api
        .import_file(
            &no_temp.path().to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor)),
        )
        .await
        .unwrap();

    let bodies = stored_bodies(&db_path, "u1", EntityType::Humidor).await.unwrap();
    assert_eq!(bodies[0]["name"], "Wineador");
    assert_eq!(bodies[0]["temp"], 65.0);
    assert_eq!(bodies[0]["humidity"], 68.0);
    assert_eq!(bodies[1]["temp"], 64.0);
}

#[tokio::test]
async fn test_mapped_quantity_beats_configured_default() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let humidor_id = seed_humidor(&db_path, "u1", "Desk").await.unwrap();
    ConfigApi::new(db_path.clone())
        .set_config(config_keys::DEFAULT_CIGAR_QUANTITY, "5")
        .unwrap();

    // Mapped quantity cells win over the configured default
    let summary = ImportApi::new(db_path.clone())
        .import_file(
            &fixture("cigars_mixed.csv").to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u1", EntityType::Cigar))
                .with_humidor(&humidor_id),
        )
        .await
        .unwrap();
    assert_eq!(summary.written, 2);

    let bodies = stored_bodies(&db_path, "u1", EntityType::Cigar).await.unwrap();
    assert_eq!(bodies[0]["quantity"], 2);
    assert_eq!(bodies[1]["quantity"], 10);
}

#[tokio::test]
async fn test_export_uses_configured_delimiter() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    ConfigApi::new(db_path.clone())
        .set_config(config_keys::CSV_DELIMITER, ";")
        .unwrap();

    let import_api = ImportApi::new(db_path.clone());
    import_api
        .import_file(
            &fixture("humidors_semicolon.csv").to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u1", EntityType::Humidor)),
        )
        .await
        .unwrap();

    let export_dir = tempfile::tempdir().unwrap();
    let export_path = export_dir.path().join("humidors.csv");
    ExportApi::new(db_path.clone())
        .export_to_file(&export_path, "u1", EntityType::Humidor, ExportFormat::Csv, None)
        .await
        .unwrap();

    let exported = std::fs::read_to_string(&export_path).unwrap();
    assert!(exported.starts_with("id;name;"));

    // Same settings, so the export reads back as-is
    let summary = import_api
        .import_file(
            &export_path.to_string_lossy(),
            ImportRequest::new(CollectionHandle::new("u2", EntityType::Humidor)),
        )
        .await
        .unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.rejected, 0);

    let original = stored_bodies(&db_path, "u1", EntityType::Humidor).await.unwrap();
    let copied = stored_bodies(&db_path, "u2", EntityType::Humidor).await.unwrap();
    assert_eq!(copied, original);
}
