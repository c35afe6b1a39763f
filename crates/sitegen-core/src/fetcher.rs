//! Page fetching for paginated collection endpoints.
//!
//! [`PageFetcher`] is the seam between the aggregation loop and the network:
//! the loop only ever asks for "page N of size M with these filters". The
//! production implementation, [`HttpPageFetcher`], issues a single bounded
//! `GET` per call and performs no retries of its own.

use crate::envelope::unwrap_items;
use crate::{Error, RemoteItem, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// One page request against a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index.
    pub page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Extra query parameters (for example `lang=en`), sent in key order.
    pub filter: BTreeMap<String, String>,
}

impl PageRequest {
    /// Create a request for `page` with `per_page` items and no filter.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            filter: BTreeMap::new(),
        }
    }

    /// Replace the filter map.
    #[must_use]
    pub fn with_filter(mut self, filter: BTreeMap<String, String>) -> Self {
        self.filter = filter;
        self
    }
}

/// Items returned for one page, in endpoint order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Items of the page.
    pub items: Vec<RemoteItem>,
    /// Number of elements the endpoint returned, before any filtering.
    pub raw_count: usize,
}

impl Page {
    /// A page with no items, used as the end-of-collection signal.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            raw_count: 0,
        }
    }

    /// Build a page from the elements of an unwrapped envelope.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Self {
        Self {
            items: values.iter().map(RemoteItem::from_value).collect(),
            raw_count: values.len(),
        }
    }
}

/// Source of collection pages.
///
/// Implementations should perform exactly one request per call and leave
/// retry decisions to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;
}

/// Fetch a page, degrading any failure to an empty page.
///
/// This is the "no more pages" reading of a failed request: callers that
/// need to tell failure from exhaustion should call
/// [`PageFetcher::fetch_page`] directly.
pub async fn fetch_or_empty<F: PageFetcher + ?Sized>(fetcher: &F, request: &PageRequest) -> Page {
    match fetcher.fetch_page(request).await {
        Ok(page) => page,
        Err(e) => {
            warn!(page = request.page, error = %e, category = e.category(), "page fetch failed");
            Page::empty()
        },
    }
}

/// Build the HTTP client used for collection requests.
///
/// One client can be shared by every collection of a run through
/// [`HttpPageFetcher::with_client`].
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sitegen/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(Error::Network)
}

/// HTTP client for one collection endpoint.
pub struct HttpPageFetcher {
    client: Client,
    endpoint: Url,
}

impl HttpPageFetcher {
    /// Creates a fetcher for `endpoint` with the default timeout.
    pub fn new(endpoint: Url) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher with a custom per-request timeout.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }

    /// Shares an existing client (and its connection pool) with a new endpoint.
    #[must_use]
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// The endpoint this fetcher pages through.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a page, including query parameters.
    #[must_use]
    pub fn page_url(&self, request: &PageRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &request.page.to_string())
                .append_pair("per_page", &request.per_page.to_string());
            for (key, value) in &request.filter {
                query.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, page = request.page))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let url = self.page_url(request);
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("GET {url} exceeded the request timeout"))
            } else {
                Error::Network(e)
            }
        })?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "Collection endpoint '{}' returned 404",
                    self.endpoint
                )));
            }
            return Err(response
                .error_for_status()
                .err()
                .map_or_else(|| Error::Other(format!("Unexpected status {status}")), Error::Network));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Response from {url} is not JSON: {e}")))?;
        let values = unwrap_items(&value).ok_or_else(|| {
            Error::Parse(format!("Response from {url} has no recognizable item array"))
        })?;

        let page = Page::from_values(values);
        debug!(count = page.raw_count, "fetched page");
        Ok(page)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::match_wildcard_for_single_variants
)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn fetcher_for(server: &MockServer, route: &str) -> HttpPageFetcher {
        let endpoint = Url::parse(&format!("{}{route}", server.uri())).unwrap();
        HttpPageFetcher::with_timeout(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_page_url_carries_pagination_and_filter() {
        let endpoint = Url::parse("https://api.example.test/api/blogs").unwrap();
        let fetcher = HttpPageFetcher::new(endpoint).unwrap();
        let mut filter = BTreeMap::new();
        filter.insert("lang".to_string(), "en".to_string());
        let url = fetcher.page_url(&PageRequest::new(3, 50).with_filter(filter));
        assert_eq!(
            url.as_str(),
            "https://api.example.test/api/blogs?page=3&per_page=50&lang=en"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_parses_nested_envelope() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blogs"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"data": [
                    {"slug": "a", "created_at": "2024-01-05T00:00:00Z"},
                    {"slug": "b"}
                ]}
            })))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server, "/api/blogs");
        let mut filter = BTreeMap::new();
        filter.insert("lang".to_string(), "en".to_string());
        let page = fetcher
            .fetch_page(&PageRequest::new(1, 100).with_filter(filter))
            .await?;

        assert_eq!(page.raw_count, 2);
        assert_eq!(page.items[0].slug.as_deref(), Some("a"));
        assert_eq!(page.items[1].slug.as_deref(), Some("b"));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = fetcher_for(&server, "/missing")
            .fetch_page(&PageRequest::new(1, 10))
            .await;
        match result {
            Err(Error::NotFound(msg)) => assert!(msg.contains("404")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_server_error_is_recoverable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, "/api/blogs")
            .fetch_page(&PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "network");
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_unknown_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, "/api/blogs")
            .fetch_page(&PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let fetcher = HttpPageFetcher::with_timeout(endpoint, Duration::from_millis(50)).unwrap();
        let err = fetcher.fetch_page(&PageRequest::new(1, 10)).await.unwrap_err();
        assert!(err.is_recoverable(), "timeouts should be retryable: {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_or_empty_degrades_transport_failure() {
        // Nothing listens on this port once the server is dropped.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let endpoint = Url::parse(&format!("{uri}/api/blogs")).unwrap();
        let fetcher = HttpPageFetcher::with_timeout(endpoint, Duration::from_secs(1)).unwrap();

        let page = fetch_or_empty(&fetcher, &PageRequest::new(1, 10)).await;
        assert_eq!(page, Page::empty());
    }
}
