//! Paginated product loading.
//!
//! A catalog page is built in three steps:
//!
//! ```text
//! manifest ──flatten──▶ [(category, folder, global_index)]   all products, indexed
//!          ──slice───▶  page_size entries for the page
//!          ──fetch───▶  metadata.txt per entry, parsed       one at a time, in order
//! ```
//!
//! ## Global index
//!
//! Each product's index is its position in the flattened
//! category-then-folder list, assigned before slicing. It never depends on
//! the page or on which neighbours failed to load, so the alternating
//! left/right layout stays stable as the visitor pages through the catalog.
//!
//! ## Failures
//!
//! Only a manifest failure aborts a load. An unknown category or a missing
//! `metadata.txt` is logged and reported in [`LoadedPage::warnings`]; the
//! product is left out and everything else loads normally.
//!
//! ## Images without metadata
//!
//! When a product's metadata has no `images` key, the loader lists the
//! product folder and keeps the image files it finds in
//! [`ProductEntry::available_images`]. A folder that cannot be listed just
//! leaves that list empty.
//!
//! ## Cache
//!
//! Loaded pages are memoized in a [`PageCache`] keyed by `"{category|all}-{page}"`.
//! Revisiting a page does no I/O. The cache is only ever cleared as a whole,
//! which the [`Session`](crate::session::Session) does on every category change.

use crate::manifest::{Manifest, ManifestError, ManifestLoader};
use crate::metadata::{ProductMetadata, is_image_file};
use crate::pagination::page_bounds;
use crate::source::{FetchError, Source, join_path};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
}

/// Where product folders live and how pages are cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub manifest_path: String,
    pub base_folder: String,
    pub metadata_file: String,
    pub page_size: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            manifest_path: "manifest.json".to_string(),
            base_folder: "images/Categorias".to_string(),
            metadata_file: "metadata.txt".to_string(),
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl LoaderOptions {
    /// Site-relative path of a product folder.
    pub fn product_dir(&self, category: &str, product_folder: &str) -> String {
        join_path(&[&self.base_folder, category, product_folder])
    }

    /// Site-relative path of a product's metadata file.
    pub fn metadata_path(&self, category: &str, product_folder: &str) -> String {
        join_path(&[&self.base_folder, category, product_folder, &self.metadata_file])
    }
}

/// One product on a loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductEntry {
    pub metadata: ProductMetadata,
    pub category: String,
    pub product_folder: String,
    pub global_index: usize,
    /// Image files found in the product folder. Only filled in when the
    /// metadata has no `images` key.
    pub available_images: Vec<String>,
}

impl ProductEntry {
    /// Images to show: the metadata's list, or the folder's images without one.
    pub fn images(&self) -> &[String] {
        self.metadata.images_or(&self.available_images)
    }

    /// Site-relative path of a media file named in this product's metadata.
    pub fn asset_path(&self, base_folder: &str, filename: &str) -> String {
        join_path(&[base_folder, &self.category, &self.product_folder, filename])
    }

    /// Layout direction. Products alternate sides by global index, starting
    /// with the hero on the right for index 0.
    pub fn is_reversed(&self) -> bool {
        self.global_index % 2 == 0
    }
}

/// A non-fatal problem encountered while loading a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    UnknownCategory { category: String },
    MissingMetadata { path: String, reason: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory { category } => {
                write!(f, "category \"{category}\" not found in manifest")
            }
            Self::MissingMetadata { path, reason } => {
                write!(f, "metadata unavailable: {path} ({reason})")
            }
        }
    }
}

/// Result of loading one catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPage {
    pub page: u32,
    pub entries: Vec<ProductEntry>,
    /// Products in the whole selection, not just this page.
    pub total_count: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Cache key for a (category, page) pair.
pub fn cache_key(category: Option<&str>, page: u32) -> String {
    format!("{}-{}", category.unwrap_or("all"), page)
}

/// Memoized pages for the current category selection.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: HashMap<String, LoadedPage>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&LoadedPage> {
        self.pages.get(key)
    }

    pub fn set(&mut self, key: String, page: LoadedPage) {
        self.pages.insert(key, page);
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A product position in the flattened manifest, before its metadata is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef<'a> {
    pub category: &'a str,
    pub product_folder: &'a str,
    pub global_index: usize,
}

/// Flatten the manifest into indexed product positions.
///
/// With a category filter only that category is listed; an unknown category
/// yields nothing plus a warning. Without a filter every category is listed
/// in manifest order.
pub fn flatten<'a>(
    manifest: &'a Manifest,
    category: Option<&str>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<ProductRef<'a>> {
    let selected: Vec<(&'a str, &'a [String])> = match category {
        Some(name) => match manifest.iter().find(|(c, _)| *c == name) {
            Some(entry) => vec![entry],
            None => {
                log::warn!("category \"{name}\" not found in manifest");
                warnings.push(LoadWarning::UnknownCategory {
                    category: name.to_string(),
                });
                Vec::new()
            }
        },
        None => manifest.iter().collect(),
    };

    selected
        .into_iter()
        .flat_map(|(category, folders)| folders.iter().map(move |f| (category, f.as_str())))
        .enumerate()
        .map(|(global_index, (category, product_folder))| ProductRef {
            category,
            product_folder,
            global_index,
        })
        .collect()
}

/// Loads catalog pages through a [`Source`], memoizing the manifest and pages.
#[derive(Debug)]
pub struct ProductLoader<S> {
    source: S,
    options: LoaderOptions,
    manifest: ManifestLoader,
    cache: PageCache,
}

impl<S: Source> ProductLoader<S> {
    pub fn new(source: S, options: LoaderOptions) -> Self {
        let manifest = ManifestLoader::new(options.manifest_path.clone());
        Self {
            source,
            options,
            manifest,
            cache: PageCache::new(),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Drop every memoized page. The manifest stays memoized.
    pub fn clear_cache(&mut self) {
        log::debug!("clearing {} cached pages", self.cache.len());
        self.cache.clear();
    }

    pub fn manifest(&mut self) -> Result<&Manifest, ManifestError> {
        self.manifest.load(&self.source)
    }

    /// Category names in manifest order.
    pub fn categories(&mut self) -> Result<Vec<String>, ManifestError> {
        Ok(self.manifest()?.category_names().map(String::from).collect())
    }

    /// Load one page (1-based) of the selection.
    ///
    /// A page past the end is not an error: it comes back empty with the
    /// real `total_count`.
    pub fn load_page(
        &mut self,
        category: Option<&str>,
        page: u32,
    ) -> Result<LoadedPage, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidPage(page));
        }

        let key = cache_key(category, page);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("page cache hit: {key}");
            return Ok(cached.clone());
        }

        log::info!(
            "loading page {page} of {}",
            category.unwrap_or("all categories")
        );

        let Self {
            source,
            options,
            manifest,
            cache,
        } = self;
        let manifest = manifest.load(&*source)?;

        let mut warnings = Vec::new();
        let products = flatten(manifest, category, &mut warnings);
        let total_count = products.len();

        let (start, end) = page_bounds(page, options.page_size);
        let slice = products
            .get(start.min(total_count)..end.min(total_count))
            .unwrap_or_default();

        let mut entries = Vec::with_capacity(slice.len());
        for product in slice {
            let path = options.metadata_path(product.category, product.product_folder);
            match source.fetch_text(&path) {
                Ok(text) => {
                    let metadata = ProductMetadata::parse(&text);
                    let available_images = if metadata.list("images").is_some() {
                        Vec::new()
                    } else {
                        folder_images(&*source, options, product)
                    };
                    entries.push(ProductEntry {
                        metadata,
                        category: product.category.to_string(),
                        product_folder: product.product_folder.to_string(),
                        global_index: product.global_index,
                        available_images,
                    });
                }
                Err(e) => {
                    log::warn!("skipping {}: {e}", product.product_folder);
                    warnings.push(missing_metadata(path, &e));
                }
            }
        }

        log::info!(
            "loaded {} of {} products for page {page}",
            entries.len(),
            total_count
        );

        let loaded = LoadedPage {
            page,
            entries,
            total_count,
            warnings,
        };
        cache.set(key, loaded.clone());
        Ok(loaded)
    }
}

fn folder_images<S: Source>(
    source: &S,
    options: &LoaderOptions,
    product: &ProductRef<'_>,
) -> Vec<String> {
    let dir = options.product_dir(product.category, product.product_folder);
    match source.list_files(&dir) {
        Ok(files) => files.into_iter().filter(|f| is_image_file(f)).collect(),
        Err(e) => {
            log::debug!("no image listing for {dir}: {e}");
            Vec::new()
        }
    }
}

fn missing_metadata(path: String, error: &FetchError) -> LoadWarning {
    LoadWarning::MissingMetadata {
        path,
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MemorySource, catalog_source, global_indexes, metadata_path};

    fn loader(source: &MemorySource) -> ProductLoader<&MemorySource> {
        ProductLoader::new(source, LoaderOptions::default())
    }

    fn bolsos_source() -> MemorySource {
        catalog_source(&[("Bolsos", &["A", "B", "C", "D", "E"])])
    }

    // =========================================================================
    // cache_key / flatten
    // =========================================================================

    #[test]
    fn cache_key_uses_all_without_category() {
        assert_eq!(cache_key(None, 1), "all-1");
        assert_eq!(cache_key(Some("Bolsos"), 3), "Bolsos-3");
    }

    #[test]
    fn flatten_indexes_across_categories() {
        let manifest =
            Manifest::from_json(r#"{"Bolsos": ["A", "B"], "Billeteras": ["C"]}"#).unwrap();
        let mut warnings = Vec::new();
        let refs = flatten(&manifest, None, &mut warnings);

        let summary: Vec<(&str, &str, usize)> = refs
            .iter()
            .map(|r| (r.category, r.product_folder, r.global_index))
            .collect();
        assert_eq!(
            summary,
            vec![("Bolsos", "A", 0), ("Bolsos", "B", 1), ("Billeteras", "C", 2)]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn flatten_single_category_starts_at_zero() {
        let manifest =
            Manifest::from_json(r#"{"Bolsos": ["A", "B"], "Billeteras": ["C"]}"#).unwrap();
        let mut warnings = Vec::new();
        let refs = flatten(&manifest, Some("Billeteras"), &mut warnings);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].global_index, 0);
    }

    #[test]
    fn flatten_unknown_category_warns() {
        let manifest = Manifest::from_json(r#"{"Bolsos": ["A"]}"#).unwrap();
        let mut warnings = Vec::new();
        assert!(flatten(&manifest, Some("NoSuchCategory"), &mut warnings).is_empty());
        assert_eq!(
            warnings,
            vec![LoadWarning::UnknownCategory {
                category: "NoSuchCategory".into()
            }]
        );
    }

    // =========================================================================
    // load_page
    // =========================================================================

    #[test]
    fn first_page_of_five() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        let page = loader.load_page(None, 1).unwrap();
        let folders: Vec<&str> = page.entries.iter().map(|e| e.product_folder.as_str()).collect();
        assert_eq!(folders, vec!["A", "B", "C", "D"]);
        assert_eq!(global_indexes(&page), vec![0, 1, 2, 3]);
        assert_eq!(page.total_count, 5);
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn second_page_of_five() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        let page = loader.load_page(Some("Bolsos"), 2).unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].product_folder, "E");
        assert_eq!(page.entries[0].global_index, 4);
        assert_eq!(page.entries[0].metadata.title(), "Producto E");
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn page_past_end_is_empty_with_total() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        let page = loader.load_page(None, 3).unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn page_zero_is_rejected() {
        let source = bolsos_source();
        let mut loader = loader(&source);
        assert!(matches!(
            loader.load_page(None, 0),
            Err(CatalogError::InvalidPage(0))
        ));
    }

    #[test]
    fn unknown_category_is_empty_not_error() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        let page = loader.load_page(Some("NoSuchCategory"), 1).unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_count, 0);
        assert!(matches!(
            page.warnings.as_slice(),
            [LoadWarning::UnknownCategory { category }] if category == "NoSuchCategory"
        ));
    }

    #[test]
    fn category_lookup_is_case_sensitive() {
        let source = bolsos_source();
        let mut loader = loader(&source);
        let page = loader.load_page(Some("bolsos"), 1).unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn missing_metadata_is_skipped_without_shifting_indexes() {
        let source = bolsos_source().without(&metadata_path("Bolsos", "B"));
        let mut loader = loader(&source);

        let page = loader.load_page(None, 1).unwrap();
        assert_eq!(global_indexes(&page), vec![0, 2, 3]);
        assert_eq!(page.total_count, 5);
        assert!(matches!(
            page.warnings.as_slice(),
            [LoadWarning::MissingMetadata { path, .. }] if path == &metadata_path("Bolsos", "B")
        ));
    }

    #[test]
    fn all_categories_keep_manifest_order() {
        let source = catalog_source(&[("Zapatos", &["Z1", "Z2", "Z3"]), ("Bolsos", &["B1", "B2"])]);
        let mut loader = loader(&source);

        let page = loader.load_page(None, 1).unwrap();
        let summary: Vec<(&str, &str)> = page
            .entries
            .iter()
            .map(|e| (e.category.as_str(), e.product_folder.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("Zapatos", "Z1"), ("Zapatos", "Z2"), ("Zapatos", "Z3"), ("Bolsos", "B1")]
        );

        let page = loader.load_page(None, 2).unwrap();
        assert_eq!(page.entries[0].product_folder, "B2");
        assert_eq!(page.entries[0].global_index, 4);
    }

    #[test]
    fn fetches_metadata_in_flattened_order() {
        let source = catalog_source(&[("Bolsos", &["A", "B"]), ("Billeteras", &["C"])]);
        let mut loader = loader(&source);
        loader.load_page(None, 1).unwrap();

        assert_eq!(
            source.fetch_log(),
            vec![
                "manifest.json".to_string(),
                metadata_path("Bolsos", "A"),
                metadata_path("Bolsos", "B"),
                metadata_path("Billeteras", "C"),
            ]
        );
    }

    #[test]
    fn folder_images_fill_in_without_images_key() {
        let dir = "images/Categorias/Bolsos/A";
        let source = bolsos_source()
            .with(&metadata_path("Bolsos", "A"), "title: Sin lista")
            .with(&format!("{dir}/02.png"), "")
            .with(&format!("{dir}/01.jpg"), "")
            .with(&format!("{dir}/giro.mp4"), "");
        let mut loader = loader(&source);

        let page = loader.load_page(None, 1).unwrap();
        assert_eq!(page.entries[0].available_images, ["01.jpg", "02.png"]);
        assert_eq!(page.entries[0].images(), ["01.jpg", "02.png"]);
        assert_eq!(source.fetch_count(&format!("{dir}/")), 1);

        // Products with an images key are never listed.
        assert!(page.entries[1].available_images.is_empty());
        assert_eq!(page.entries[1].images(), ["01.jpg", "02.jpg"]);
        assert_eq!(source.fetch_count("images/Categorias/Bolsos/B/"), 0);
    }

    #[test]
    fn unlistable_folder_leaves_images_empty() {
        let source = bolsos_source().with(&metadata_path("Bolsos", "A"), "title: Sin lista");
        let mut loader = loader(&source);

        let page = loader.load_page(None, 1).unwrap();
        // The listing only finds metadata.txt, which is not an image.
        assert!(page.entries[0].images().is_empty());
        assert!(page.warnings.is_empty());
    }

    // =========================================================================
    // Caching
    // =========================================================================

    #[test]
    fn second_load_is_cache_hit() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        let first = loader.load_page(None, 1).unwrap();
        let fetches = source.total_fetches();
        let second = loader.load_page(None, 1).unwrap();

        assert_eq!(first, second);
        assert_eq!(source.total_fetches(), fetches);
        assert_eq!(loader.cache().len(), 1);
    }

    #[test]
    fn manifest_fetched_once_across_pages() {
        let source = bolsos_source();
        let mut loader = loader(&source);
        loader.load_page(None, 1).unwrap();
        loader.load_page(None, 2).unwrap();
        loader.load_page(Some("Bolsos"), 1).unwrap();
        assert_eq!(source.fetch_count("manifest.json"), 1);
    }

    #[test]
    fn cleared_cache_refetches() {
        let source = bolsos_source();
        let mut loader = loader(&source);

        loader.load_page(None, 1).unwrap();
        loader.clear_cache();
        loader.load_page(None, 1).unwrap();

        assert_eq!(source.fetch_count(&metadata_path("Bolsos", "A")), 2);
        assert_eq!(source.fetch_count("manifest.json"), 1);
    }

    #[test]
    fn manifest_failure_propagates_and_caches_nothing() {
        let source = MemorySource::new();
        let mut loader = loader(&source);
        assert!(matches!(
            loader.load_page(None, 1),
            Err(CatalogError::Manifest(ManifestError::Fetch(_)))
        ));
        assert!(loader.cache().is_empty());
    }

    // =========================================================================
    // ProductEntry
    // =========================================================================

    #[test]
    fn asset_path_joins_base_category_and_folder() {
        let entry = ProductEntry {
            metadata: ProductMetadata::default(),
            category: "Bolsos".into(),
            product_folder: "Bolso London".into(),
            global_index: 0,
            available_images: Vec::new(),
        };
        assert_eq!(
            entry.asset_path("images/Categorias", "01.jpg"),
            "images/Categorias/Bolsos/Bolso London/01.jpg"
        );
        assert!(entry.is_reversed());
    }
}
