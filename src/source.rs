//! Where catalog content comes from.
//!
//! The storefront is a static site: `manifest.json` at the root, product
//! folders under the configured base folder. Everything the loader reads is
//! addressed by a site-relative path like `images/Categorias/Bolsos/London/metadata.txt`,
//! and a [`Source`] turns that path into text.
//!
//! Two sources ship with the crate:
//!
//! - [`DirSource`]: reads from a local checkout of the site's public directory.
//!   Used by the CLI when `--root` is a directory, and by the integration tests.
//! - [`HttpSource`]: issues `GET {base_url}/{path}` with `minreq`. Used when
//!   `--root` is an `http://` or `https://` URL, e.g. a deployed storefront.
//!
//! Both are blocking. Fetches are issued one at a time by the loader, so
//! there is nothing to gain from an async runtime here.
//!
//! ## Listing
//!
//! [`Source::list_files`] names the files directly inside a product folder.
//! The loader uses it for products whose metadata has no `images` key.
//! [`HttpSource`] reads the server's directory index page and keeps the
//! relative links, so it only works where the host serves indexes.

use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("HTTP {status} for {path}")]
    Status { status: i32, path: String },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP error for {path}: {source}")]
    Http {
        path: String,
        #[source]
        source: minreq::Error,
    },
    #[error("response for {0} is not valid UTF-8")]
    Utf8(String),
}

/// Fetches site-relative paths as text.
pub trait Source {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// File names directly inside the site-relative directory `dir`, sorted.
    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError>;
}

impl<S: Source + ?Sized> Source for &S {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch_text(path)
    }

    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        (**self).list_files(dir)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch_text(path)
    }

    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        (**self).list_files(dir)
    }
}

/// Join a site-relative path from its segments, skipping empty ones.
///
/// ```text
/// join_path(&["images/Categorias", "Bolsos", "London", "metadata.txt"])
///   → "images/Categorias/Bolsos/London/metadata.txt"
/// ```
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Serves paths from a local directory (the site's `public/` folder).
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirSource {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        std::fs::read_to_string(&full).map_err(|e| io_error(path, e))
    }

    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        let full = self.root.join(dir.trim_start_matches('/'));
        let mut names: Vec<String> = std::fs::read_dir(&full)
            .map_err(|e| io_error(dir, e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}

fn io_error(path: &str, e: std::io::Error) -> FetchError {
    match e.kind() {
        std::io::ErrorKind::NotFound => FetchError::NotFound(path.to_string()),
        std::io::ErrorKind::InvalidData => FetchError::Utf8(path.to_string()),
        _ => FetchError::Io {
            path: path.to_string(),
            source: e,
        },
    }
}

/// Serves paths over HTTP from a deployed site.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    timeout_secs: u64,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Absolute URL for a site-relative path. Path segments are
    /// percent-encoded since category and folder names carry spaces and accents.
    pub fn url_for(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| {
                url::form_urlencoded::byte_serialize(segment.as_bytes())
                    .collect::<String>()
                    .replace('+', "%20")
            })
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }

    fn get(&self, path: &str, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {url}");
        let response = minreq::get(url)
            .with_timeout(self.timeout_secs)
            .send()
            .map_err(|source| FetchError::Http {
                path: path.to_string(),
                source,
            })?;

        match response.status_code {
            200..=299 => {}
            404 => return Err(FetchError::NotFound(path.to_string())),
            status => {
                return Err(FetchError::Status {
                    status,
                    path: path.to_string(),
                });
            }
        }

        response
            .as_str()
            .map(str::to_string)
            .map_err(|_| FetchError::Utf8(path.to_string()))
    }
}

impl Source for HttpSource {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.get(path, &self.url_for(path))
    }

    fn list_files(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/", self.url_for(dir.trim_end_matches('/')));
        let html = self.get(dir, &url)?;
        Ok(index_links(&html))
    }
}

/// File links on a directory index page: relative hrefs that do not point
/// into a subdirectory, upwards, or at the site root.
pub fn index_links(html: &str) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut names: Vec<String> = document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim_start_matches("./"))
        .filter(|href| !href.is_empty() && !href.contains('/') && !href.contains(':'))
        .filter(|href| !href.starts_with('?') && !href.starts_with('#'))
        .map(String::from)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Whether a `--root` argument names a remote site rather than a directory.
pub fn is_remote(root: &str) -> bool {
    root.starts_with("http://") || root.starts_with("https://")
}
