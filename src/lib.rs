//! # Leather Catalog
//!
//! The product catalog behind a leather-goods storefront. The site is static:
//! a `manifest.json` lists product folders per category, and every product
//! folder holds a hand-written `metadata.txt` next to its photos and videos.
//! This crate reads that content and serves it one page at a time.
//!
//! # Loading a Page
//!
//! ```text
//! ?categoria=Bolsos ──▶ category ─┐
//!                                 ├─▶ loader ──▶ LoadedPage { entries, total_count, warnings }
//! manifest.json ─────▶ manifest ──┘      │
//!                                        └─ metadata.txt per product on the page
//! ```
//!
//! Pages and the manifest are memoized for the lifetime of a [`session::Session`].
//! Switching category drops the cached pages; the manifest is fetched once.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | `key: value` metadata parser and display defaults |
//! | [`manifest`] | Manifest type and the memoizing manifest loader |
//! | [`category`] | Category filter from the `categoria` query parameter |
//! | [`loader`] | Flattening, global indexes, page slicing, page cache |
//! | [`pagination`] | Page counts and page-change rules |
//! | [`session`] | Per-visitor state: caches, pager, stale-response guard |
//! | [`source`] | Fetch seam: local directory or HTTP |
//! | [`config`] | `catalog.toml` loading, merging and validation |
//! | [`scaffold`] | Manifest and starter metadata from a folder tree |
//! | [`render`] | Static HTML for a catalog page, using Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Forgiving Content
//!
//! Product metadata is typed by hand. A malformed line is skipped, a missing
//! metadata file drops only that product, and an unknown category renders an
//! empty page. Only an unreadable manifest fails a load, because without it
//! there is nothing to page through.
//!
//! ## Stable Global Index
//!
//! Product sections alternate left/right across the whole catalog. The index
//! that drives this is assigned while flattening the manifest, before the
//! page is cut and before any metadata is fetched, so it never shifts when a
//! neighbour fails to load or the visitor changes page.
//!
//! ## Blocking Fetches
//!
//! A page holds four products and they are fetched one after another, in
//! display order. The [`source::Source`] trait is synchronous; an async
//! runtime would add weight without changing what the visitor sees.

pub mod category;
pub mod config;
pub mod loader;
pub mod manifest;
pub mod metadata;
pub mod output;
pub mod pagination;
pub mod render;
pub mod scaffold;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
