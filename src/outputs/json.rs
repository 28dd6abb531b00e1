//! JSON snapshot of a catalogue run.
//!
//! Files are named after the run date so repeated runs on the same day
//! replace each other:
//! ```text
//! json_output_dir/
//! ├── 2025-05-06.json
//! └── 2025-05-07.json
//! ```

use crate::models::Catalogue;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Catalogue`] to `{json_output_dir}/{local_date}.json`.
///
/// The directory is created and checked for writability first.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_catalogue(
    catalogue: &Catalogue,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(catalogue)?;

    if let Err(e) = ensure_writable_dir(json_output_dir).await {
        error!(error = %e, "JSON output directory is not writable");
        return Err(e);
    }

    let path = PathBuf::from(json_output_dir).join(format!("{}.json", catalogue.local_date));
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), airports = catalogue.airports.len(), "Wrote catalogue JSON");

    Ok(path)
}
