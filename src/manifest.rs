//! The catalog manifest.
//!
//! `manifest.json` sits at the site root and lists every product folder,
//! grouped by category, in the order products should appear:
//!
//! ```json
//! {
//!   "Bolsos": ["Bolso London", "Bolso Duffle"],
//!   "Billeteras": ["Billetera Slim"]
//! }
//! ```
//!
//! Object key order is significant (it is the category order of the "all
//! categories" view), so categories are held in an [`IndexMap`].
//!
//! The manifest is fetched once per session by [`ManifestLoader`] and never
//! re-fetched or invalidated afterwards.

use crate::source::{FetchError, Source};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to fetch manifest: {0}")]
    Fetch(#[from] FetchError),
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Category name → ordered product folder names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    categories: IndexMap<String, Vec<String>>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Category names in manifest order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Product folders for a category. Lookup is case-sensitive.
    pub fn folders(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, folders)| (name.as_str(), folders.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total product folders across all categories.
    pub fn product_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Append a category. Replaces the folder list if the name already exists,
    /// keeping its original position.
    pub fn insert(&mut self, category: impl Into<String>, folders: Vec<String>) {
        self.categories.insert(category.into(), folders);
    }
}

/// Fetches the manifest on first use and memoizes it for the session.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: String,
    cached: Option<Manifest>,
}

impl ManifestLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Return the manifest, fetching it only if no previous load succeeded.
    ///
    /// A failed fetch or parse is returned to the caller and leaves nothing
    /// memoized, so the next call tries again.
    pub fn load<S: Source>(&mut self, source: &S) -> Result<&Manifest, ManifestError> {
        let manifest = match self.cached.take() {
            Some(m) => m,
            None => {
                log::debug!("fetching manifest from {}", self.path);
                let text = source.fetch_text(&self.path)?;
                let manifest = Manifest::from_json(&text)?;
                log::info!(
                    "manifest loaded: {} categories, {} products",
                    manifest.len(),
                    manifest.product_count()
                );
                manifest
            }
        };
        Ok(self.cached.insert(manifest))
    }

    pub fn cached(&self) -> Option<&Manifest> {
        self.cached.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MemorySource;

    // =========================================================================
    // Manifest
    // =========================================================================

    #[test]
    fn from_json_preserves_category_order() {
        let m = Manifest::from_json(r#"{"Zapatos": ["a"], "Bolsos": ["b", "c"], "Accesorios": []}"#)
            .unwrap();
        let names: Vec<&str> = m.category_names().collect();
        assert_eq!(names, vec!["Zapatos", "Bolsos", "Accesorios"]);
        assert_eq!(m.product_count(), 3);
    }

    #[test]
    fn folders_lookup_is_case_sensitive() {
        let m = Manifest::from_json(r#"{"Bolsos": ["A"]}"#).unwrap();
        assert_eq!(m.folders("Bolsos"), Some(&["A".to_string()][..]));
        assert_eq!(m.folders("bolsos"), None);
    }

    #[test]
    fn from_json_rejects_wrong_shape() {
        assert!(Manifest::from_json(r#"{"Bolsos": "A"}"#).is_err());
        assert!(Manifest::from_json(r#"["Bolsos"]"#).is_err());
    }

    #[test]
    fn json_roundtrip_keeps_order() {
        let mut m = Manifest::default();
        m.insert("Bolsos", vec!["London".into()]);
        m.insert("Accesorios", vec!["Cinturón".into()]);
        let back = Manifest::from_json(&m.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, m);
    }

    // =========================================================================
    // ManifestLoader
    // =========================================================================

    #[test]
    fn load_fetches_once() {
        let source = MemorySource::new().with("manifest.json", r#"{"Bolsos": ["A"]}"#);
        let mut loader = ManifestLoader::new("manifest.json");

        assert_eq!(loader.load(&source).unwrap().len(), 1);
        assert_eq!(loader.load(&source).unwrap().len(), 1);
        assert_eq!(source.fetch_count("manifest.json"), 1);
    }

    #[test]
    fn load_missing_manifest_is_fetch_error() {
        let source = MemorySource::new();
        let mut loader = ManifestLoader::new("manifest.json");
        assert!(matches!(
            loader.load(&source),
            Err(ManifestError::Fetch(FetchError::NotFound(_)))
        ));
        assert!(!loader.is_loaded());
    }

    #[test]
    fn load_invalid_json_is_error_and_retried() {
        let source = MemorySource::new().with("manifest.json", "not json");
        let mut loader = ManifestLoader::new("manifest.json");
        assert!(matches!(loader.load(&source), Err(ManifestError::Json(_))));
        assert!(loader.load(&source).is_err());
        assert_eq!(source.fetch_count("manifest.json"), 2);
    }
}
