//! Catalog configuration.
//!
//! Handles loading and validating `catalog.toml`. Stock defaults
//! match the storefront's layout, so a site that follows the usual layout
//! needs no config file at all:
//!
//! ```text
//! public/
//! ├── manifest.json
//! └── images/
//!     └── Categorias/
//!         ├── Bolsos/
//!         │   ├── Bolso London/
//!         │   │   ├── metadata.txt
//!         │   │   ├── 01.jpg
//!         │   │   └── giro.mp4
//!         │   └── Bolso Duffle/
//!         └── Billeteras/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_root = "public"              # Directory or http(s) URL serving the site
//! manifest_path = "manifest.json"   # Relative to site_root
//! base_folder = "images/Categorias" # Category folders live under this
//! metadata_file = "metadata.txt"    # Per-product metadata file name
//! category_param = "categoria"      # Query parameter selecting a category
//! page_size = 4                     # Products per catalog page
//! catalog_path = "/productos"       # Path of the catalog page, for links
//! ```
//!
//! The file is flat: every key has a default, so a file only needs the keys
//! it changes. Unknown keys are rejected to catch typos early.

use crate::loader::LoaderOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "catalog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Catalog configuration loaded from `catalog.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Local directory or `http(s)://` URL the site is served from.
    pub site_root: String,
    /// Location of the manifest, relative to `site_root`.
    pub manifest_path: String,
    /// Folder holding one directory per category.
    pub base_folder: String,
    /// Name of the per-product metadata file.
    pub metadata_file: String,
    /// Query parameter that selects a single category.
    pub category_param: String,
    /// Products per page.
    pub page_size: usize,
    /// Path of the catalog page, used when rendering pager and category links.
    pub catalog_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let loader = LoaderOptions::default();
        Self {
            site_root: "public".to_string(),
            manifest_path: loader.manifest_path,
            base_folder: loader.base_folder,
            metadata_file: loader.metadata_file,
            category_param: crate::category::DEFAULT_CATEGORY_PARAM.to_string(),
            page_size: loader.page_size,
            catalog_path: "/productos".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Validation(
                "page_size must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("manifest_path", &self.manifest_path),
            ("metadata_file", &self.metadata_file),
            ("category_param", &self.category_param),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        if self.metadata_file.contains('/') {
            return Err(ConfigError::Validation(
                "metadata_file must be a file name, not a path".into(),
            ));
        }
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            manifest_path: self.manifest_path.clone(),
            base_folder: self.base_folder.clone(),
            metadata_file: self.metadata_file.clone(),
            page_size: self.page_size,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Parse and validate the contents of a `catalog.toml`. Missing keys take
/// their defaults.
pub fn parse_config(content: &str) -> Result<CatalogConfig, ConfigError> {
    let config: CatalogConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a specific file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<CatalogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load `catalog.toml` from a directory, falling back to stock defaults
/// when the file doesn't exist.
pub fn load_config(dir: &Path) -> Result<CatalogConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        log::debug!("no {} in {}, using defaults", CONFIG_FILENAME, dir.display());
        return Ok(CatalogConfig::default());
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `catalog.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Leather Catalog Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Where the site is served from: a local directory (the site's public/
# folder) or an http(s) URL of the deployed storefront.
site_root = "public"

# Location of the category -> product folders index, relative to site_root.
manifest_path = "manifest.json"

# Folder holding one directory per category, each holding one directory per
# product. Media paths in metadata files are relative to the product folder.
base_folder = "images/Categorias"

# Per-product metadata file (key: value lines).
metadata_file = "metadata.txt"

# Query parameter that filters the catalog to one category:
#   /productos?categoria=Bolsos
category_param = "categoria"

# Products shown per catalog page.
page_size = 4

# Path of the catalog page, used for pager and category links.
catalog_path = "/productos"
"##
}
