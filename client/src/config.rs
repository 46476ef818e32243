//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_credentials_dir() -> PathBuf {
    PathBuf::from(".review-client")
}

/// Configuration values for the review client.
///
/// Resolution order follows OrthoConfig's layering: CLI arguments, then
/// `REVIEW_*` environment variables, then configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEW")]
pub struct ClientConfig {
    /// Base URL of the review service API.
    pub api_base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Directory holding the persisted credential document.
    pub credentials_dir: Option<PathBuf>,
    /// Directory downloaded reports are written into.
    pub report_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from the environment and configuration files.
    ///
    /// # Errors
    ///
    /// Returns an [`ortho_config::OrthoError`] when a layer fails to parse.
    pub fn load() -> ortho_config::OrthoResult<Self> {
        Self::load_from_iter([std::ffi::OsString::from("review-cli")])
    }

    /// Configured API base URL, falling back to the local default.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Configured request timeout, falling back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Configured credential directory, falling back to the default.
    #[must_use]
    pub fn credentials_dir(&self) -> PathBuf {
        self.credentials_dir
            .clone()
            .unwrap_or_else(default_credentials_dir)
    }

    /// Configured report output directory, falling back to the working
    /// directory.
    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
