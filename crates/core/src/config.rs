//! Gallery settings stored in a `config.toml` file.
//!
//! ```toml
//! [storage]
//! database = "/home/me/.walltastic/gallery.db"
//! catalog_key = "uploaded_images"
//! favorites_key = "favorites"
//!
//! [display]
//! page_size = 25
//!
//! [device]
//! download_dir = "/home/me/.walltastic/downloads"
//! ```
//!
//! Every field is optional; a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pager::DEFAULT_PAGE_SIZE;

pub const DEFAULT_CATALOG_KEY: &str = "uploaded_images";
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";

/// `$HOME/.walltastic`, or `./.walltastic` when `HOME` is unset.
pub fn default_base_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".walltastic")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database: PathBuf,
    pub catalog_key: String,
    pub favorites_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_base_dir().join("gallery.db"),
            catalog_key: DEFAULT_CATALOG_KEY.to_string(),
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub download_dir: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            download_dir: default_base_dir().join("downloads"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub device: DeviceConfig,
}

impl GalleryConfig {
    pub fn default_path() -> PathBuf {
        default_base_dir().join("config.toml")
    }

    /// Read the config at `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Catalog and favorites each need their own non-blank key.
    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        let storage = &self.storage;
        if storage.catalog_key.trim().is_empty() {
            return Err(Error::InvalidConfig("storage.catalog_key is empty".to_string()));
        }
        if storage.favorites_key.trim().is_empty() {
            return Err(Error::InvalidConfig("storage.favorites_key is empty".to_string()));
        }
        if storage.catalog_key == storage.favorites_key {
            return Err(Error::InvalidConfig(format!(
                "storage.catalog_key and storage.favorites_key are both `{}`",
                storage.catalog_key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GalleryConfig::load_from_path(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.display.page_size, 25);
        assert_eq!(config.storage.catalog_key, "uploaded_images");
        assert_eq!(config.storage.favorites_key, "favorites");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[display]\npage_size = 10\n").unwrap();

        let config = GalleryConfig::load_from_path(&path).unwrap();
        assert_eq!(config.display.page_size, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let mut config = GalleryConfig::default();
        config.storage.database = tmp.path().join("g.db");
        config.storage.catalog_key = "images_v2".to_string();
        config.device.download_dir = tmp.path().join("dl");

        config.save_to_path(&path).unwrap();
        assert_eq!(GalleryConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[display\npage_size = ").unwrap();
        assert!(matches!(
            GalleryConfig::load_from_path(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[display]\npage_size = 0\n").unwrap();
        assert!(matches!(
            GalleryConfig::load_from_path(&path),
            Err(Error::InvalidPageSize)
        ));
    }

    #[test]
    fn test_shared_store_key_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[storage]\nfavorites_key = \"uploaded_images\"\n").unwrap();
        assert!(matches!(
            GalleryConfig::load_from_path(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_blank_store_keys_rejected() {
        let mut config = GalleryConfig::default();
        config.storage.catalog_key = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GalleryConfig::default();
        config.storage.favorites_key = String::new();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_save_refuses_invalid_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = GalleryConfig::default();
        config.storage.favorites_key = config.storage.catalog_key.clone();

        assert!(config.save_to_path(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_defaults_are_valid() {
        GalleryConfig::default().validate().unwrap();
    }
}
