//! Plain-text catalogue report.
//!
//! One block per airport, numbered from 1 in extraction order:
//!
//! ```text
//! 1. John F. Kennedy
//!    Country: United States
//!    City: New York Jfk
//!    URL: /lounges/united-states/new-york-jfk
//!    Terminals:
//!      1. Terminal 4
//!
//! ```
//!
//! The `Terminals:` header is always printed, even when the list is empty.

use crate::models::Airport;
use std::fmt;

/// Display adapter that renders airports as the text report.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a>(pub &'a [Airport]);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, airport) in self.0.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, airport.name)?;
            writeln!(f, "   Country: {}", airport.country)?;
            writeln!(f, "   City: {}", airport.city)?;
            writeln!(f, "   URL: {}", airport.url)?;
            writeln!(f, "   Terminals:")?;
            for (j, terminal) in airport.terminals.iter().enumerate() {
                writeln!(f, "     {}. {}", j + 1, terminal.name)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
