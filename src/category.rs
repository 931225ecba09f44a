//! Category selection from the page URL.
//!
//! The catalog page filters by category through a query parameter:
//! `/productos?categoria=Bolsos`. No parameter means every category.

use url::Url;

pub const DEFAULT_CATEGORY_PARAM: &str = "categoria";

/// Read the category filter from a page URL.
///
/// The value is percent-decoded and returned as authored (matching against
/// the manifest is case-sensitive). An absent or empty parameter means
/// "all categories". If the parameter repeats, the first occurrence wins.
pub fn resolve_category(url: &Url, param: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Parse a page location. Accepts absolute URLs or site-relative locations
/// like `/productos?categoria=Bolsos` and `?categoria=Bolsos`.
pub fn parse_location(location: &str) -> Result<Url, url::ParseError> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/")?;
            base.join(location)
        }
        Err(e) => Err(e),
    }
}

/// Location of the catalog page filtered to `category` (or unfiltered).
pub fn catalog_location(path: &str, param: &str, category: Option<&str>) -> String {
    match category {
        Some(name) => {
            let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair(param, name)
                .finish();
            format!("{path}?{encoded}")
        }
        None => path.to_string(),
    }
}
