use crate::error::{ResolverError, Result};
use std::env;
use std::time::Duration;

pub const API_URL_ENV: &str = "CRUMBTRAIL_API_URL";
pub const HTTP_TIMEOUT_ENV: &str = "CRUMBTRAIL_HTTP_TIMEOUT_MS";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with `CRUMBTRAIL_API_URL` and `CRUMBTRAIL_HTTP_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(url) = var(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            cfg = cfg.with_api_base_url(&url);
        }
        if let Some(raw) = var(HTTP_TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                ResolverError::Config(format!(
                    "{HTTP_TIMEOUT_ENV} must be milliseconds, got {raw:?}"
                ))
            })?;
            cfg.request_timeout = Duration::from_millis(ms);
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
