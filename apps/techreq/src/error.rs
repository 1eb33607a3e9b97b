//! Errors surfaced by CLI commands.

use std::path::PathBuf;
use thiserror::Error;

use techreq_core::{CatalogError, ParseEnumError};

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("API error: {0}")]
    Api(#[from] techreq_sdk::Error),

    #[error(transparent)]
    Parse(#[from] ParseEnumError),

    #[error("could not replace catalog file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// `init` refused to clobber an existing catalog.
    #[error("catalog already exists at {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("catalog file has unsupported version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A referenced record is missing and the catalog call does not say so itself.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Products whose indicators fail validation cannot be uploaded.
    #[error("{count} product(s) have invalid indicators: {names}")]
    Invalid { count: usize, names: String },

    #[error("no API URL configured (set --api-url or TECHREQ_API_URL)")]
    MissingApiUrl,

    #[error("{0}")]
    Usage(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CliError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
