//! HTML rendering of a catalog page.
//!
//! Turns a [`LoadedPage`] into a standalone HTML document: category menu,
//! one section per product, and the pager. This is what the storefront's
//! client code draws after a page load, rendered ahead of time so it can be
//! served statically or previewed from the CLI.
//!
//! ## Product sections
//!
//! - **Hero**: the first video if the product has any, otherwise the first
//!   image (or `hero.jpg` when there is none). Images come from the
//!   metadata's `images` list, or from the product folder without one.
//! - **Gallery**: every image when a video took the hero spot; otherwise the
//!   images after the first (or the lone image, so the gallery is never
//!   empty when an image exists).
//! - **Layout**: sections alternate direction by global index
//!   ([`ProductEntry::is_reversed`]), so the alternation is continuous
//!   across pages.
//! - **Text**: title, subtitle, code and description use the metadata
//!   accessors, which apply the defaults for missing keys.
//!
//! ## Pager
//!
//! Only drawn when there is more than one page. Previous/next are disabled
//! on the first/last page and then carry no `data-page`; the current page
//! number is marked active.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating
//! with automatic escaping.

use crate::category::catalog_location;
use crate::loader::{LoadedPage, ProductEntry};
use crate::pagination::Pagination;
use maud::{DOCTYPE, Markup, html};

const CSS: &str = include_str!("../static/catalog.css");

pub const FALLBACK_HERO: &str = "hero.jpg";
pub const EMPTY_MESSAGE: &str = "No se encontraron productos para esta categoría.";

/// Site settings the renderer needs besides the page itself.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub site_title: &'a str,
    pub base_folder: &'a str,
    pub catalog_path: &'a str,
    pub category_param: &'a str,
    /// Every category in manifest order, for the menu. May be empty.
    pub categories: &'a [String],
    pub current_category: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroMedia {
    Video(String),
    Image(String),
}

/// Pick the hero media for a product.
pub fn hero_media(entry: &ProductEntry) -> HeroMedia {
    if let Some(video) = entry.metadata.videos().into_iter().next() {
        return HeroMedia::Video(video);
    }
    let image = entry
        .images()
        .first()
        .map(String::as_str)
        .unwrap_or(FALLBACK_HERO);
    HeroMedia::Image(image.to_string())
}

/// Images shown in the gallery beside the hero.
pub fn gallery_images(entry: &ProductEntry) -> &[String] {
    let images = entry.images();
    let has_video = !entry.metadata.videos().is_empty();
    if has_video || images.len() <= 1 {
        images
    } else {
        &images[1..]
    }
}

/// Render the full HTML document for a loaded page.
pub fn render_catalog_page(page: &LoadedPage, pagination: &Pagination, ctx: &RenderContext) -> Markup {
    let title = match ctx.current_category {
        Some(category) => format!("{category} · {}", ctx.site_title),
        None => ctx.site_title.to_string(),
    };

    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (render_category_nav(ctx))
                main.catalog {
                    @if page.entries.is_empty() {
                        div.empty-state { (EMPTY_MESSAGE) }
                    } @else {
                        @for entry in &page.entries {
                            (render_product(entry, ctx.base_folder))
                        }
                    }
                    (render_pager(pagination))
                }
            }
        }
    }
}

/// Category menu with an "all" entry first.
pub fn render_category_nav(ctx: &RenderContext) -> Markup {
    html! {
        nav.category-nav {
            ul {
                li class=[ctx.current_category.is_none().then_some("current")] {
                    a href=(catalog_location(ctx.catalog_path, ctx.category_param, None)) { "Todos" }
                }
                @for category in ctx.categories {
                    @let is_current = ctx.current_category == Some(category.as_str());
                    li class=[is_current.then_some("current")] {
                        a href=(catalog_location(ctx.catalog_path, ctx.category_param, Some(category))) {
                            (category)
                        }
                    }
                }
            }
        }
    }
}

/// One product section.
pub fn render_product(entry: &ProductEntry, base_folder: &str) -> Markup {
    let meta = &entry.metadata;
    let title = meta.title();
    let asset = |filename: &str| entry.asset_path(base_folder, filename);

    html! {
        section.product-section.reversed[entry.is_reversed()] data-product=(entry.product_folder) {
            div.hero-side {
                div.hero-image-wrapper {
                    @match hero_media(entry) {
                        HeroMedia::Video(file) => {
                            video.hero-image autoplay loop muted playsinline {
                                source src=(asset(&file)) type="video/mp4";
                            }
                        }
                        HeroMedia::Image(file) => {
                            img.hero-image src=(asset(&file)) alt=(title);
                        }
                    }
                    div.product-title-overlay {
                        div.product-subtitle { (meta.subtitle(&entry.category)) }
                        h2 { (title) }
                    }
                }
            }
            div.gallery-side {
                div.accent-number { (meta.code(entry.global_index)) }
                div.description-text {
                    p { (meta.description()) }
                }
                div.gallery-grid {
                    @for (idx, file) in gallery_images(entry).iter().enumerate() {
                        div.gallery-item {
                            img src=(asset(file)) alt={ (title) " - Imagen " (idx + 1) } loading="lazy";
                        }
                    }
                }
            }
        }
    }
}

/// Pager controls. Empty markup for a single page or none.
pub fn render_pager(pagination: &Pagination) -> Markup {
    let total = pagination.total_pages();
    let current = pagination.current_page;
    let previous = pagination.has_previous().then(|| current - 1);
    let next = pagination.has_next().then(|| current + 1);

    html! {
        @if total > 1 {
            nav.pagination-container aria-label="Paginación" {
                button.pagination-btn.pagination-prev
                    data-page=[previous]
                    disabled[previous.is_none()] { "‹ Anterior" }
                div.pagination-numbers {
                    @for n in 1..=total as u32 {
                        button.pagination-number.active[n == current] data-page=(n) { (n) }
                    }
                }
                button.pagination-btn.pagination-next
                    data-page=[next]
                    disabled[next.is_none()] { "Siguiente ›" }
            }
        }
    }
}
