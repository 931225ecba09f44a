//! Product metadata files.
//!
//! Every product folder carries a `metadata.txt` written by hand (or by
//! `leather-catalog scaffold`), one `key: value` pair per line:
//!
//! ```text
//! title: Bolso Duffle
//! subtitle: Cuero Para Viajar
//! description: Bolso de viaje en cuero curtido vegetal, costuras a mano.
//! code: 07
//! images: 01.jpg, 02.jpg, detalle.jpg
//! videos: giro.mp4
//! ```
//!
//! ## Parsing rules
//!
//! - Keys are trimmed and lowercased; values are trimmed.
//! - Only the first colon splits, so `description: Horario: 9 a 18` keeps
//!   `Horario: 9 a 18` as the value.
//! - `images` and `videos` are comma-separated lists. Pieces are trimmed and
//!   empty pieces dropped, so `a.jpg,  b.jpg ,,c.jpg` is three files.
//! - A repeated key overwrites the earlier one.
//! - Lines without a colon, or with nothing before it, are skipped.
//!
//! Parsing never fails. Metadata is authored by people editing text files,
//! and a typo on one line should not hide the whole product.
//!
//! ## Defaults
//!
//! The parser injects nothing. Fallbacks for missing keys live on the
//! accessor methods ([`ProductMetadata::title`] and friends), which is what
//! the renderer and CLI output read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys whose values are comma-separated filename lists.
pub const LIST_KEYS: &[&str] = &["images", "videos"];

pub const DEFAULT_TITLE: &str = "Producto";
pub const DEFAULT_DESCRIPTION: &str = "Descripción del producto.";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

pub fn is_image_file(name: &str) -> bool {
    has_extension(name, IMAGE_EXTENSIONS)
}

pub fn is_video_file(name: &str) -> bool {
    has_extension(name, VIDEO_EXTENSIONS)
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }
}

/// Parsed contents of one `metadata.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductMetadata {
    fields: BTreeMap<String, MetadataValue>,
}

impl ProductMetadata {
    /// Parse a metadata file. Malformed lines are dropped silently.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_skipped(text).0
    }

    /// Parse a metadata file, also returning the 1-based line numbers
    /// (relative to the trimmed text) of non-blank lines that were skipped.
    pub fn parse_with_skipped(text: &str) -> (Self, Vec<usize>) {
        let mut fields = BTreeMap::new();
        let mut skipped = Vec::new();

        for (idx, line) in text.trim().split('\n').enumerate() {
            let Some((raw_key, raw_value)) = line.split_once(':') else {
                if !line.trim().is_empty() {
                    skipped.push(idx + 1);
                }
                continue;
            };
            let key = raw_key.trim().to_lowercase();
            if key.is_empty() {
                skipped.push(idx + 1);
                continue;
            }

            let value = if LIST_KEYS.contains(&key.as_str()) {
                MetadataValue::List(split_list(raw_value))
            } else {
                MetadataValue::Text(raw_value.trim().to_string())
            };
            fields.insert(key, value);
        }

        (Self { fields }, skipped)
    }

    /// Serialize back to `key: value` lines. Lists are joined with `, `.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            out.push_str(key);
            out.push_str(": ");
            match value {
                MetadataValue::Text(s) => out.push_str(s),
                MetadataValue::List(items) => out.push_str(&items.join(", ")),
            }
            out.push('\n');
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_text)
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(MetadataValue::as_list)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) {
        self.fields.insert(key.into().to_lowercase(), value);
    }

    // -------------------------------------------------------------------------
    // Consumer-side defaults
    // -------------------------------------------------------------------------

    pub fn title(&self) -> &str {
        non_empty(self.text("title")).unwrap_or(DEFAULT_TITLE)
    }

    /// Subtitle, falling back to the category name in upper case.
    pub fn subtitle(&self, category: &str) -> String {
        non_empty(self.text("subtitle"))
            .map(str::to_string)
            .unwrap_or_else(|| category.to_uppercase())
    }

    pub fn description(&self) -> &str {
        non_empty(self.text("description")).unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Product code, falling back to the 1-based global position as two digits.
    pub fn code(&self, global_index: usize) -> String {
        non_empty(self.text("code"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:0>2}", global_index + 1))
    }

    pub fn images(&self) -> &[String] {
        self.list("images").unwrap_or_default()
    }

    /// Images named in the metadata, or `available` when there is no
    /// `images` key at all. An empty `images:` line still wins.
    pub fn images_or<'a>(&'a self, available: &'a [String]) -> &'a [String] {
        self.list("images").unwrap_or(available)
    }

    /// Video files. Older metadata used a single `video:` key.
    pub fn videos(&self) -> Vec<String> {
        if let Some(list) = self.list("videos") {
            return list.to_vec();
        }
        non_empty(self.text("video"))
            .map(|v| vec![v.to_string()])
            .unwrap_or_default()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
