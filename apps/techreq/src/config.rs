//! Runtime configuration resolved from flags and environment.
//!
//! clap reads `TECHREQ_*` variables as fallbacks for the global flags; this
//! module turns the parsed values into one [`AppConfig`] the commands share.

use std::path::PathBuf;
use std::time::Duration;

use techreq_sdk::TechReqClient;

use crate::error::{CliError, Result};

/// Catalog file used when neither `--catalog` nor `TECHREQ_CATALOG` is set.
pub const DEFAULT_CATALOG_PATH: &str = "techreq.json";

/// Request timeout in seconds when `--timeout-secs` is not given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Snapshot file holding the local catalog.
    pub catalog: PathBuf,
    /// REST backend root, without the `/technical-requirements` prefix.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Print machine-readable output.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_PATH),
            api_url: None,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            json: false,
        }
    }
}

impl AppConfig {
    /// Config for a catalog file with everything else defaulted.
    #[must_use]
    pub fn for_catalog(catalog: impl Into<PathBuf>) -> Self {
        Self {
            catalog: catalog.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the REST client. Blank URLs and keys count as unset.
    pub fn client(&self) -> Result<TechReqClient> {
        let url = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(CliError::MissingApiUrl)?;
        let key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        Ok(TechReqClient::with_options(url, key, self.timeout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_file() {
        let config = AppConfig::default();
        assert_eq!(config.catalog, PathBuf::from("techreq.json"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.json);
    }

    #[test]
    fn client_requires_url() {
        let config = AppConfig::for_catalog("x.json");
        assert!(matches!(config.client(), Err(CliError::MissingApiUrl)));

        let blank = AppConfig::for_catalog("x.json").with_api_url("  ");
        assert!(matches!(blank.client(), Err(CliError::MissingApiUrl)));
    }

    #[test]
    fn client_uses_configured_url() {
        let config = AppConfig::for_catalog("x.json").with_api_url("http://localhost:8080/");
        let client = config.client().ok();
        assert_eq!(
            client.as_ref().map(TechReqClient::base_url),
            Some("http://localhost:8080")
        );
    }
}
