//! Main CatalogClient

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::api::Page;
use crate::api::ProductSource;
use crate::config::CatalogConfig;
use crate::error::FetchError;

/// HTTP client for the products endpoint.
///
/// Each [`fetch_page`](ProductSource::fetch_page) call issues exactly one
/// `GET {base_url}?limit={page_size}&skip={offset}` request. Nothing is
/// retried or cached.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use catalog_lib::CatalogClient;
///
/// let client = CatalogClient::builder()
///     .url("https://dummyjson.com/products")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let page = client.fetch_page(0, NonZeroUsize::new(10).unwrap()).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl CatalogClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> CatalogClientBuilder<Missing> {
        CatalogClientBuilder::new()
    }

    /// Builds a client from a [`CatalogConfig`].
    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        let mut builder = Self::builder().url(config.base_url.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }

    /// Returns the base URL of the products endpoint.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Builds the request URL for a page.
    pub fn page_url(&self, offset: usize, page_size: NonZeroUsize) -> Url {
        page_url(&self.inner.base_url, offset, page_size)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        let url = self.page_url(offset, page_size);
        debug!("GET {}", url);

        let mut request = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::response(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| FetchError::parse_with_body(e.to_string(), body))
    }
}

impl CatalogClient {
    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Transport(err),
        }
    }
}

/// Appends `limit` and `skip` to the base URL, keeping any existing query.
fn page_url(base: &Url, offset: usize, page_size: NonZeroUsize) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("limit", &page_size.to_string())
        .append_pair("skip", &offset.to_string());
    url
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`CatalogClient`].
///
/// The base URL is required; `build` is only available once it is set.
pub struct CatalogClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl CatalogClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the products endpoint URL.
    pub fn url(self, url: impl Into<String>) -> CatalogClientBuilder<Set<String>> {
        CatalogClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for CatalogClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> CatalogClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl CatalogClientBuilder<Set<String>> {
    /// Builds the [`CatalogClient`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<CatalogClient, FetchError> {
        let Set(raw_url) = self.url;
        let base_url =
            Url::parse(&raw_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw_url, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(CatalogClient {
            inner: Arc::new(CatalogClientInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_page_url() {
        let base = Url::parse("https://dummyjson.com/products").unwrap();
        assert_eq!(
            page_url(&base, 20, size(10)).as_str(),
            "https://dummyjson.com/products?limit=10&skip=20"
        );
    }

    #[test]
    fn test_page_url_keeps_existing_query() {
        let base = Url::parse("http://localhost:3000/products?select=title").unwrap();
        assert_eq!(
            page_url(&base, 0, size(5)).as_str(),
            "http://localhost:3000/products?select=title&limit=5&skip=0"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = CatalogClient::builder().url("::nope::").build().unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_from_config() {
        let config = CatalogConfig::default().with_base_url("http://127.0.0.1:9/products");
        let client = CatalogClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/products");
    }
}
