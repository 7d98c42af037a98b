//! Catalog configuration

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::ConfigError;
use crate::viewport::TriggerOptions;

/// Default catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com/products";

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Environment variable overriding the base URL.
pub const ENV_URL: &str = "CATALOG_URL";
/// Environment variable overriding the page size.
pub const ENV_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";
/// Environment variable setting the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "CATALOG_TIMEOUT_SECS";

/// Configuration for the catalog client, controller and trigger.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use catalog_lib::config::CatalogConfig;
///
/// let config = CatalogConfig::default()
///     .with_page_size(NonZeroUsize::new(25).unwrap())
///     .with_request_timeout(Duration::from_secs(10));
/// assert_eq!(config.page_size.get(), 25);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint queried as `{base_url}?limit=..&skip=..`.
    ///
    /// Default: [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Products requested per fetch. Fixed for the life of a controller.
    ///
    /// Default: 10
    pub page_size: NonZeroUsize,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// Connection timeout applied when building the HTTP client.
    pub connect_timeout: Option<Duration>,

    /// Sentinel observation options.
    pub trigger: TriggerOptions,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
            connect_timeout: None,
            trigger: TriggerOptions::default(),
        }
    }
}

impl CatalogConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from the `CATALOG_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            config.base_url = url;
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            let size: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE.to_string(),
                value: raw.clone(),
            })?;
            config.page_size = NonZeroUsize::new(size).ok_or(ConfigError::ZeroPageSize)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the sentinel observation options.
    pub fn with_trigger(mut self, trigger: TriggerOptions) -> Self {
        self.trigger = trigger;
        self
    }

    /// Checks that the base URL parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
