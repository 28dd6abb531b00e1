//! Extraction rules that turn lounge-site markup into catalogue records.
//!
//! Each entity type has its own rule, compiled once at startup from
//! [`crate::config::RulesConfig`] and passed by reference into the pipeline.
//!
//! | Entity | Module | Page | Filtering |
//! |--------|--------|------|-----------|
//! | [`Airport`](crate::models::Airport) | [`airports`] | Index page | Empty names and paths deeper than the airport level are dropped |
//! | [`Terminal`](crate::models::Terminal) | [`terminals`] | Airport detail page | None beyond trimming |
//!
//! # Common Patterns
//!
//! Rules are total: markup that does not match yields an empty `Vec`, never
//! an error. Matching is purely structural (a fixed class name and nesting
//! shape), so a layout change on the site surfaces as empty output rather
//! than a failure. Records come back in the order they appear in the markup
//! and are never deduplicated.

pub mod airports;
pub mod terminals;

pub use airports::AirportRule;
pub use terminals::TerminalRule;

use regex::Regex;
use std::error::Error;

/// A compiled rule that extracts records of one entity type from markup.
pub trait ExtractionRule {
    /// The record type produced by this rule.
    type Record;

    /// Extract every matching record from `html`, in source order.
    fn extract(&self, html: &str) -> Vec<Self::Record>;
}

/// Compile `pattern` and check that it defines every named capture group in
/// `required`.
pub(crate) fn compile_pattern(pattern: &str, required: &[&str]) -> Result<Regex, Box<dyn Error>> {
    let re = Regex::new(pattern)?;
    for group in required {
        if !re.capture_names().flatten().any(|name| name == *group) {
            return Err(format!("pattern is missing the `{group}` capture group: {pattern}").into());
        }
    }
    Ok(re)
}
