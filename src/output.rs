//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every product is shown by its identity in the catalog (global position,
//! code and title) with its folder as secondary context on an indented
//! `Source:` line. Warnings go last, after the pager summary.
//!
//! ## Categories
//!
//! ```text
//! Categories
//! 001 Bolsos (5 products)
//! 002 Billeteras (1 product)
//! ```
//!
//! ## Page
//!
//! ```text
//! Bolsos, page 1 of 2 (5 products)
//! 001 [01] Bolso London
//!     Source: Bolsos/Bolso London
//!     Media: 3 images, 1 video
//! 002 [02] Bolso Duffle
//!     Source: Bolsos/Bolso Duffle
//!     Media: 2 images
//!
//! Warnings
//!     metadata unavailable: images/Categorias/Bolsos/C/metadata.txt (not found: ...)
//! ```
//!
//! ## Scaffold
//!
//! ```text
//! Bolsos
//!     Bolso London: wrote metadata (code 01)
//!     Bolso Duffle: existing metadata
//!
//! 1 written, 1 existing, 0 without images
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::loader::{LoadWarning, LoadedPage, ProductEntry};
use crate::manifest::Manifest;
use crate::pagination::Pagination;
use crate::scaffold::{ProductStatus, ScaffoldReport};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Categories
// ============================================================================

pub fn format_categories(manifest: &Manifest) -> Vec<String> {
    if manifest.is_empty() {
        return vec!["No categories".to_string()];
    }
    let mut lines = vec!["Categories".to_string()];
    for (pos, (name, folders)) in manifest.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(pos + 1),
            name,
            plural(folders.len(), "product", "products")
        ));
    }
    lines
}

pub fn print_categories(manifest: &Manifest) {
    for line in format_categories(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Pages
// ============================================================================

fn media_line(entry: &ProductEntry) -> Option<String> {
    let images = entry.images().len();
    let videos = entry.metadata.videos().len();
    match (images, videos) {
        (0, 0) => None,
        (i, 0) => Some(plural(i, "image", "images")),
        (0, v) => Some(plural(v, "video", "videos")),
        (i, v) => Some(format!(
            "{}, {}",
            plural(i, "image", "images"),
            plural(v, "video", "videos")
        )),
    }
}

pub fn format_page(page: &LoadedPage, pagination: &Pagination, category: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    let scope = category.unwrap_or("All categories");
    let total_pages = pagination.total_pages();

    if total_pages == 0 {
        lines.push(format!("{scope}: no products"));
    } else {
        lines.push(format!(
            "{scope}, page {} of {} ({})",
            page.page,
            total_pages,
            plural(page.total_count, "product", "products")
        ));
    }

    if page.entries.is_empty() && total_pages > 0 {
        lines.push(format!("{}(past the last page)", indent(1)));
    }

    for entry in &page.entries {
        lines.push(format!(
            "{} [{}] {}",
            format_index(entry.global_index + 1),
            entry.metadata.code(entry.global_index),
            entry.metadata.title()
        ));
        lines.push(format!(
            "{}Source: {}/{}",
            indent(1),
            entry.category,
            entry.product_folder
        ));
        if let Some(media) = media_line(entry) {
            lines.push(format!("{}Media: {}", indent(1), media));
        }
    }

    lines.extend(format_warnings(&page.warnings));
    lines
}

pub fn format_warnings(warnings: &[LoadWarning]) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Warnings".to_string()];
    lines.extend(warnings.iter().map(|w| format!("{}{}", indent(1), w)));
    lines
}

pub fn print_page(page: &LoadedPage, pagination: &Pagination, category: Option<&str>) {
    for line in format_page(page, pagination, category) {
        println!("{}", line);
    }
}

// ============================================================================
// Scaffold
// ============================================================================

pub fn format_scaffold(report: &ScaffoldReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_category: Option<&str> = None;

    for product in &report.products {
        if current_category != Some(product.category.as_str()) {
            if current_category.is_some() {
                lines.push(String::new());
            }
            lines.push(product.category.clone());
            current_category = Some(product.category.as_str());
        }
        let status = match &product.status {
            ProductStatus::Written { code } => format!("wrote metadata (code {code})"),
            ProductStatus::Existing => "existing metadata".to_string(),
            ProductStatus::NoImages => "no images, skipped".to_string(),
        };
        lines.push(format!("{}{}: {}", indent(1), product.product_folder, status));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} written, {} existing, {} without images",
        report.written(),
        report.existing(),
        report.without_images()
    ));
    lines
}

pub fn print_scaffold(report: &ScaffoldReport) {
    for line in format_scaffold(report) {
        println!("{}", line);
    }
}
