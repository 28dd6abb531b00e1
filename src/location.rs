//! Location inference from lounge-detail URLs.
//!
//! The index page does not label airports with a country or city, but every
//! airport link follows the same path layout:
//!
//! ```text
//! /lounges/<country-slug>/<city-slug>-<airport-suffix>
//! ```
//!
//! The city and airport slugs are joined by a hyphen just like the words
//! inside each slug, so they cannot be told apart. The city field therefore
//! carries the whole combined slug (`new-york-jfk` becomes `New York Jfk`).

use crate::utils::title_case;

/// Derive `(country, city)` from a lounge-detail URL path.
///
/// The path is split on `/`; segment 2 is the country slug and segment 3 the
/// combined city/airport slug. Hyphens become spaces and each word is
/// title-cased.
///
/// Paths with fewer than four segments produce `("", "")`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     infer_location("/lounges/united-states/new-york-jfk"),
///     ("United States".to_string(), "New York Jfk".to_string())
/// );
/// assert_eq!(infer_location("/lounges"), (String::new(), String::new()));
/// ```
pub fn infer_location(url: &str) -> (String, String) {
    let parts: Vec<&str> = url.split('/').collect();
    if parts.len() < 4 {
        return (String::new(), String::new());
    }

    let country = title_case(&parts[2].replace('-', " "));
    let city = title_case(&parts[3].replace('-', " "));
    (country, city)
}
