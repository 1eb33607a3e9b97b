//! # Snapshot Storage
//!
//! The local catalog lives in a single JSON file holding a
//! [`CatalogSnapshot`]. Writes go to a temporary file in the same directory
//! which is then renamed over the target, so a crash never leaves a
//! half-written catalog behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use techreq_core::{CatalogContext, CatalogSnapshot, SNAPSHOT_VERSION};

use crate::error::{CliError, Result};

/// Load the catalog stored at `path`.
pub fn load_catalog(path: &Path) -> Result<CatalogContext> {
    let content = fs::read_to_string(path)?;
    let snapshot: CatalogSnapshot = serde_json::from_str(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CliError::UnsupportedVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    debug!(
        path = %path.display(),
        products = snapshot.products.len(),
        sets = snapshot.sets.len(),
        "catalog loaded"
    );
    Ok(CatalogContext::from_snapshot(snapshot))
}

/// Load the catalog at `path`, or start an empty one if the file is missing.
pub fn load_or_create_catalog(path: &Path) -> Result<CatalogContext> {
    if path.exists() {
        load_catalog(path)
    } else {
        info!(path = %path.display(), "no catalog file, starting empty");
        Ok(CatalogContext::new())
    }
}

/// Write the catalog to `path` atomically.
pub fn save_catalog(context: &CatalogContext, path: &Path) -> Result<()> {
    let snapshot = context.to_snapshot();
    let json = serde_json::to_vec_pretty(&snapshot)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&json)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    debug!(
        path = %path.display(),
        products = snapshot.products.len(),
        sets = snapshot.sets.len(),
        "catalog saved"
    );
    Ok(())
}
