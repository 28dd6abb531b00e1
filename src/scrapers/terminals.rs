//! Terminal extraction from an airport's detail page.
//!
//! Each terminal heading on the detail page is a pair of nested blocks:
//!
//! ```html
//! <div class="terminal-name " ...>
//!     <div class="terminal-name-text"> Terminal 1 </div>
//! </div>
//! ```

use super::{ExtractionRule, compile_pattern};
use crate::models::Terminal;
use regex::Regex;
use std::error::Error;
use tracing::{debug, instrument};

/// Compiled rule for terminal headings on an airport detail page.
#[derive(Debug, Clone)]
pub struct TerminalRule {
    pattern: Regex,
}

impl TerminalRule {
    /// Compile a terminal rule from a regex with a named `name` group.
    pub fn new(pattern: &str) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pattern: compile_pattern(pattern, &["name"])?,
        })
    }
}

impl ExtractionRule for TerminalRule {
    type Record = Terminal;

    #[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
    fn extract(&self, html: &str) -> Vec<Terminal> {
        let terminals: Vec<Terminal> = self
            .pattern
            .captures_iter(html)
            .filter_map(|caps| caps.name("name"))
            .map(|m| Terminal {
                name: m.as_str().trim().to_string(),
            })
            .collect();

        debug!(count = terminals.len(), "Extracted terminals");
        terminals
    }
}
