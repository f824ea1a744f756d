//! Snapshot loading.

use std::fs;
use std::path::Path;

use abp_store::Database;
use anyhow::{Context, Result};

/// Load a database snapshot from JSON.
///
/// # Errors
/// Fails when the file is unreadable or not a valid snapshot.
pub fn load(path: &Path) -> Result<Database> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "loading snapshot");
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}
