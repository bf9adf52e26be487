//! File persistence helpers.
//!
//! Settings and exports are written atomically: to a temporary sibling file
//! first, then renamed over the target.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/wikileaders`
/// - Linux: `~/.config/wikileaders`
/// - Windows: `%APPDATA%\wikileaders`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("wikileaders"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

// ============================================================================
// File Operations
// ============================================================================

async fn create_parent_dirs(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(path = %parent.display(), "Creating directory");
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Writes text to a file atomically, creating parent directories.
pub async fn save_text(path: &Path, contents: &str) -> Result<(), StoreError> {
    create_parent_dirs(path).await?;

    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| StoreError::Config(format!("not a file path: {}", path.display())))?;
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, contents).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = contents.len(), "File saved");
    Ok(())
}

/// Saves data to a pretty-printed JSON file.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");
    let json = serde_json::to_string_pretty(data)?;
    save_text(path, &json).await
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Ensures a directory exists.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        let path = default_config_dir();
        assert!(!path.as_os_str().is_empty());
    }

    #[test]
    fn test_default_settings_path() {
        let path = default_settings_path();
        assert!(path.ends_with("settings.json"));
    }

    #[tokio::test]
    async fn test_save_text_leaves_no_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("leaders.csv");

        save_text(&path, "Country,Leader,First Paragraph\n").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["leaders.csv"]);
    }
}
