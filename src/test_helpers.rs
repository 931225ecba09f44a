//! Shared test utilities for the leather-catalog test suite.
//!
//! The central piece is [`MemorySource`], an in-memory [`Source`] that
//! records every fetch so tests can assert on cache hits and fetch order.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = catalog_source(&[("Bolsos", &["A", "B"])]);
//! let mut loader = ProductLoader::new(&source, LoaderOptions::default());
//! let page = loader.load_page(None, 1).unwrap();
//!
//! assert_eq!(global_indexes(&page), vec![0, 1]);
//! assert_eq!(source.fetch_count("manifest.json"), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::loader::LoadedPage;
use crate::source::{FetchError, Source, join_path};

pub const BASE_FOLDER: &str = "images/Categorias";

// =========================================================================
// MemorySource
// =========================================================================

/// In-memory site content keyed by site-relative path.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    log: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Every path requested so far, in request order.
    pub fn fetch_log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.log.borrow().iter().filter(|p| *p == path).count()
    }

    pub fn total_fetches(&self) -> usize {
        self.log.borrow().len()
    }
}

impl Source for MemorySource {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.log.borrow_mut().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }

    /// Logged as `"{dir}/"`, so listings and fetches count separately.
    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.log.borrow_mut().push(prefix.clone());
        let mut names: Vec<String> = self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(String::from)
            .collect();
        if names.is_empty() {
            return Err(FetchError::NotFound(dir.to_string()));
        }
        names.sort();
        Ok(names)
    }
}

// =========================================================================
// Catalog fixtures
// =========================================================================

/// Default metadata path for a product under [`BASE_FOLDER`].
pub fn metadata_path(category: &str, folder: &str) -> String {
    join_path(&[BASE_FOLDER, category, folder, "metadata.txt"])
}

/// Build a manifest in the given order, plus a metadata file per product
/// titled `Producto {folder}`.
pub fn catalog_source(categories: &[(&str, &[&str])]) -> MemorySource {
    // serde_json::Map sorts keys without `preserve_order`, so the manifest
    // text is written by hand to keep the order the test asked for.
    let ordered: Vec<String> = categories
        .iter()
        .map(|(name, folders)| {
            format!(
                "{}: {}",
                serde_json::json!(name),
                serde_json::json!(folders)
            )
        })
        .collect();
    let mut source = MemorySource::new().with("manifest.json", &format!("{{{}}}", ordered.join(", ")));

    for (category, folders) in categories {
        for folder in *folders {
            source = source.with(
                &metadata_path(category, folder),
                &format!("title: Producto {folder}\ncode: {folder}\nimages: 01.jpg, 02.jpg\n"),
            );
        }
    }
    source
}

pub fn global_indexes(page: &LoadedPage) -> Vec<usize> {
    page.entries.iter().map(|e| e.global_index).collect()
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write a site directory: `manifest.json` plus one `metadata.txt` per
/// product, using the same content as [`catalog_source`].
pub fn write_site(root: &Path, categories: &[(&str, &[&str])]) {
    let source = catalog_source(categories);
    for (path, content) in &source.files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
}
