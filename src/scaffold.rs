//! Content scaffolding from a category directory tree.
//!
//! Product photos are organised on disk first; the manifest and metadata
//! files are derived from that layout:
//!
//! ```text
//! images/Categorias/              # categories root
//! ├── Bolsos/                     # category
//! │   ├── Bolso London/           # product folder
//! │   │   ├── metadata.txt        # written here if missing
//! │   │   ├── 01.jpg
//! │   │   └── giro.mp4
//! │   └── Bolso Duffle/
//! └── Billeteras/
//! ```
//!
//! [`scaffold`] walks that tree and
//!
//! 1. writes a starter `metadata.txt` into every product folder that has at
//!    least one image but no metadata yet, numbering `code` sequentially
//!    (`01`, `02`, ...) across the whole run, and
//! 2. builds a [`Manifest`] listing every product folder.
//!
//! Existing metadata files are never touched. Categories and products are
//! visited in name order, so codes and manifest order are reproducible.

use crate::manifest::Manifest;
use crate::metadata::{MetadataValue, ProductMetadata, is_image_file, is_video_file};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("categories root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// What happened to one product folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductStatus {
    /// A new metadata file was written with this code.
    Written { code: String },
    /// The folder already had a metadata file.
    Existing,
    /// No images, so no metadata was written.
    NoImages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReport {
    pub category: String,
    pub product_folder: String,
    pub status: ProductStatus,
}

/// Result of a scaffold run.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub manifest: Manifest,
    pub products: Vec<ProductReport>,
}

impl ScaffoldReport {
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, ProductStatus::Written { .. }))
    }

    pub fn existing(&self) -> usize {
        self.count(|s| *s == ProductStatus::Existing)
    }

    pub fn without_images(&self) -> usize {
        self.count(|s| *s == ProductStatus::NoImages)
    }

    fn count(&self, pred: impl Fn(&ProductStatus) -> bool) -> usize {
        self.products.iter().filter(|p| pred(&p.status)).count()
    }
}

/// Scaffold metadata files under `categories_root` and build the manifest.
pub fn scaffold(categories_root: &Path, metadata_file: &str) -> Result<ScaffoldReport, ScaffoldError> {
    if !categories_root.is_dir() {
        return Err(ScaffoldError::NotADirectory(categories_root.to_path_buf()));
    }

    let mut report = ScaffoldReport::default();
    let mut next_code = 1u32;

    for category_dir in sorted_subdirs(categories_root)? {
        let category = dir_name(&category_dir);
        let mut folders = Vec::new();

        for product_dir in sorted_subdirs(&category_dir)? {
            let product_folder = dir_name(&product_dir);
            let metadata_path = product_dir.join(metadata_file);

            let status = if metadata_path.exists() {
                log::debug!("{category}/{product_folder}: metadata exists");
                ProductStatus::Existing
            } else {
                let media = list_media(&product_dir)?;
                if media.images.is_empty() {
                    log::warn!("{category}/{product_folder}: no images, skipping metadata");
                    ProductStatus::NoImages
                } else {
                    let code = format!("{next_code:0>2}");
                    next_code += 1;
                    let metadata = starter_metadata(&product_folder, &code, media);
                    fs::write(&metadata_path, metadata.to_text())?;
                    log::info!("{category}/{product_folder}: wrote {metadata_file}");
                    ProductStatus::Written { code }
                }
            };

            folders.push(product_folder.clone());
            report.products.push(ProductReport {
                category: category.clone(),
                product_folder,
                status,
            });
        }

        report.manifest.insert(category, folders);
    }

    Ok(report)
}

/// Scaffold and write the resulting manifest to `manifest_path`.
pub fn scaffold_and_write(
    categories_root: &Path,
    metadata_file: &str,
    manifest_path: &Path,
) -> Result<ScaffoldReport, ScaffoldError> {
    let report = scaffold(categories_root, metadata_file)?;
    if let Some(parent) = manifest_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(manifest_path, report.manifest.to_json_pretty()?)?;
    Ok(report)
}

#[derive(Debug, Default)]
struct Media {
    images: Vec<String>,
    videos: Vec<String>,
}

/// Metadata for a product nobody has described yet: the folder name as
/// title, a sequential code, and the media found in the folder.
fn starter_metadata(product_folder: &str, code: &str, media: Media) -> ProductMetadata {
    let mut metadata = ProductMetadata::default();
    metadata.insert("title", MetadataValue::Text(product_folder.to_string()));
    metadata.insert("subtitle", MetadataValue::Text(String::new()));
    metadata.insert("description", MetadataValue::Text(String::new()));
    metadata.insert("code", MetadataValue::Text(code.to_string()));
    metadata.insert("images", MetadataValue::List(media.images));
    metadata.insert("videos", MetadataValue::List(media.videos));
    metadata
}

fn list_media(dir: &Path) -> Result<Media, ScaffoldError> {
    let mut files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .map(|p| dir_name(&p))
        .collect();
    files.sort();

    let mut media = Media::default();
    for file in files {
        if is_image_file(&file) {
            media.images.push(file);
        } else if is_video_file(&file) {
            media.videos.push(file);
        }
    }
    Ok(media)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| !dir_name(p).starts_with('.'))
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
