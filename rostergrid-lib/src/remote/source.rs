//! HTTP paging source

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::ACCEPT;
use reqwest::Client;
use url::Url;

use super::PageSource;
use super::RemoteConfig;
use crate::error::FetchError;
use crate::protocol::PageRequest;
use crate::protocol::PageResponse;

/// A paging endpoint reached over HTTP GET.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```ignore
/// use rostergrid_lib::protocol::PageRequest;
/// use rostergrid_lib::remote::{PageSource, RemotePageSource};
///
/// let source = RemotePageSource::builder()
///     .endpoint("https://escuelas.example.org/maestros/ajax/")
///     .build()?;
///
/// let page = source.fetch(&PageRequest::new(1).search("garcía")).await?;
/// println!("{} of {} rows", page.records_filtered, page.records_total);
/// ```
#[derive(Clone)]
pub struct RemotePageSource {
    inner: Arc<RemotePageSourceInner>,
}

struct RemotePageSourceInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl RemotePageSource {
    /// Creates a new builder.
    pub fn builder() -> RemotePageSourceBuilder<Missing> {
        RemotePageSourceBuilder::new()
    }

    /// Creates a source for `endpoint` with the default configuration.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder().endpoint(endpoint).build()
    }

    /// Returns the endpoint URL, without page parameters.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Returns the full URL a request is sent to.
    ///
    /// Query parameters already present on the endpoint are kept.
    pub fn request_url(&self, request: &PageRequest) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut().extend_pairs(request.to_query_pairs());
        url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.inner.timeout.unwrap_or_default())
        } else {
            FetchError::Network(err)
        }
    }
}

#[async_trait]
impl PageSource for RemotePageSource {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        let url = self.request_url(request);
        debug!("fetching page draw={} from {}", request.draw, url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let mut builder = self.inner.http_client.get(url).headers(headers);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!("page request draw={} failed with HTTP {}", request.draw, status.as_u16());
            return Err(FetchError::http(status.as_u16(), body));
        }

        let page: PageResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::parse_with_body(e.to_string(), body.clone()))?;
        page.validate(&request.columns)?;
        Ok(page)
    }
}

impl std::fmt::Debug for RemotePageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemotePageSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`RemotePageSource`].
///
/// The endpoint is required; [`build`](RemotePageSourceBuilder::build) only
/// exists once it has been set.
pub struct RemotePageSourceBuilder<Endpoint> {
    endpoint: Endpoint,
    config: RemoteConfig,
    http_client: Option<Client>,
}

impl RemotePageSourceBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            endpoint: Missing,
            config: RemoteConfig::default(),
            http_client: None,
        }
    }

    /// Sets the absolute endpoint URL.
    pub fn endpoint(self, endpoint: impl Into<String>) -> RemotePageSourceBuilder<Set<String>> {
        RemotePageSourceBuilder {
            endpoint: Set(endpoint.into()),
            config: self.config,
            http_client: self.http_client,
        }
    }
}

impl Default for RemotePageSourceBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RemotePageSourceBuilder<E> {
    /// Replaces the timeout configuration.
    pub fn config(mut self, config: RemoteConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// The connect timeout is ignored when a client is supplied.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RemotePageSourceBuilder<Set<String>> {
    /// Builds the [`RemotePageSource`].
    pub fn build(self) -> Result<RemotePageSource, FetchError> {
        let endpoint = Url::parse(&self.endpoint.0)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.endpoint.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.config.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RemotePageSource {
            inner: Arc::new(RemotePageSourceInner {
                endpoint,
                http_client,
                timeout: self.config.timeout,
            }),
        })
    }
}
