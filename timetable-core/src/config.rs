use std::time::Duration;

use crate::{Error, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const BASE_URL_ENV: &str = "TIMETABLE_API_BASE_URL";
const TIMEOUT_ENV: &str = "TIMETABLE_API_TIMEOUT_SECS";

/// Connection settings for the timetable backend.
///
/// The base URL is fixed once a gateway has been built from this config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` means requests may wait indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: format!("timetable-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Build a config from `TIMETABLE_API_BASE_URL` and `TIMETABLE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = non_blank(lookup(BASE_URL_ENV)) {
            config = config.with_base_url(url)?;
        }

        if let Some(secs) = non_blank(lookup(TIMEOUT_ENV)) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Replace the base URL, dropping any trailing slash.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Base URL '{}' must start with http:// or https://",
                url
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
