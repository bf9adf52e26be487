//! Persistence round-trip and edge case tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::error::StoreError;
use crate::persistence::{ensure_dir, load_json, save_json};
use crate::settings::{ExportFormat, Settings};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_settings_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let settings = Settings {
        concurrency: 3,
        interactive_retry: false,
        formats: vec![ExportFormat::Text],
        ..Settings::default()
    };
    settings.save(&path).await.unwrap();

    let loaded = Settings::load(&path).await.unwrap();
    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_missing_settings_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent").join("settings.json");

    let loaded = Settings::load(&path).await.unwrap();
    assert_eq!(loaded, Settings::default());
}

#[tokio::test]
async fn test_corrupt_settings_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let err = Settings::load(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_invalid_settings_values_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, r#"{"concurrency": 0}"#).await.unwrap();

    let err = Settings::load(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Config(_)));
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"us": []});
    save_json(&nested_path, &data).await.unwrap();

    assert!(nested_path.exists());
    let loaded: serde_json::Value = load_json(&nested_path).await.unwrap();
    assert_eq!(loaded, data);
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    let err = result.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_ensure_dir_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let new_dir = temp_dir.path().join("exports").join("2024");

    ensure_dir(&new_dir).await.unwrap();
    assert!(new_dir.is_dir());

    // Idempotent
    ensure_dir(&new_dir).await.unwrap();
}
