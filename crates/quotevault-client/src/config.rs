//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client runs against a local database
//! with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use quotevault_shared::constants::{PAGE_SIZE, SEARCH_MERGE_CAP};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the hosted backend. `None` selects the local store.
    /// Env: `QUOTEVAULT_API_URL`
    pub api_url: Option<String>,

    /// Public (anon) API key sent with every remote request.
    /// Env: `QUOTEVAULT_API_KEY`
    pub api_key: Option<String>,

    /// Local database file.
    /// Env: `QUOTEVAULT_DB_PATH`
    /// Default: platform data directory.
    pub db_path: Option<PathBuf>,

    /// Rows per page.
    /// Env: `QUOTEVAULT_PAGE_SIZE`
    /// Default: `20`
    pub page_size: usize,

    /// Hard cap on rows merged client-side by the dual-field search.
    /// Env: `QUOTEVAULT_SEARCH_CAP`
    /// Default: `500`
    pub search_cap: usize,

    /// HTTP request timeout.
    /// Env: `QUOTEVAULT_TIMEOUT_SECS`
    /// Default: `15`
    pub request_timeout: Duration,

    /// User id used in local mode, where nobody signs in.
    /// Env: `QUOTEVAULT_USER_ID`
    /// Default: nil UUID.
    pub local_user_id: Uuid,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            db_path: None,
            page_size: PAGE_SIZE,
            search_cap: SEARCH_MERGE_CAP,
            request_timeout: Duration::from_secs(15),
            local_user_id: Uuid::nil(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("QUOTEVAULT_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = Some(url.trim().trim_end_matches('/').to_string());
        }

        if let Some(key) = lookup("QUOTEVAULT_API_KEY").filter(|v| !v.is_empty()) {
            config.api_key = Some(key);
        }

        if let Some(path) = lookup("QUOTEVAULT_DB_PATH").filter(|v| !v.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(val) = lookup("QUOTEVAULT_PAGE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.page_size = n,
                _ => tracing::warn!(value = %val, "Invalid QUOTEVAULT_PAGE_SIZE, using default"),
            }
        }

        if let Some(val) = lookup("QUOTEVAULT_SEARCH_CAP") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.search_cap = n,
                _ => tracing::warn!(value = %val, "Invalid QUOTEVAULT_SEARCH_CAP, using default"),
            }
        }

        if let Some(val) = lookup("QUOTEVAULT_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(n) if n > 0 => config.request_timeout = Duration::from_secs(n),
                _ => tracing::warn!(value = %val, "Invalid QUOTEVAULT_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(val) = lookup("QUOTEVAULT_USER_ID") {
            match Uuid::parse_str(val.trim()) {
                Ok(id) => config.local_user_id = id,
                Err(e) => tracing::warn!(error = %e, "Invalid QUOTEVAULT_USER_ID, using nil id"),
            }
        }

        config
    }

    /// Whether requests go to the hosted backend.
    pub fn is_remote(&self) -> bool {
        self.api_url.is_some()
    }
}
