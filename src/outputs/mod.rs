//! Output generation for a finished catalogue.
//!
//! # Submodules
//!
//! - [`report`]: Renders airports and terminals as the plain-text report on stdout
//! - [`json`]: Writes the whole [`Catalogue`](crate::models::Catalogue) as a dated JSON file

pub mod json;
pub mod report;
