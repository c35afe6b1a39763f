//! Aggregation loop over a paginated collection.
//!
//! Pages are requested strictly in order, starting at page 1, each awaited
//! before the next is issued. The loop ends on the first page whose item
//! count is below the requested page size (including an empty page), on a
//! page that still fails after its retries, or when an optional page cap is
//! reached.
//!
//! A failed page never fails the run: whatever was collected before it is
//! returned, and the outcome records why the loop stopped so that an early
//! stop caused by the network can be told apart from a genuinely exhausted
//! collection.
//!
//! ```
//! use sitegen_core::aggregate::{AggregateOptions, StopReason, aggregate};
//! use sitegen_core::fetcher::{Page, PageFetcher, PageRequest};
//! use sitegen_core::{RemoteItem, Result};
//!
//! struct TwoItems;
//!
//! #[async_trait::async_trait]
//! impl PageFetcher for TwoItems {
//!     async fn fetch_page(&self, _request: &PageRequest) -> Result<Page> {
//!         let item = |slug: &str| RemoteItem { slug: Some(slug.into()), ..Default::default() };
//!         Ok(Page { items: vec![item("a"), item("b")], raw_count: 2 })
//!     }
//! }
//!
//! # tokio_test_block(async {
//! let outcome = aggregate(&TwoItems, &AggregateOptions::new(100)).await;
//! assert_eq!(outcome.items.len(), 2);
//! assert_eq!(outcome.fetch_calls, 1);
//! assert_eq!(outcome.stop, StopReason::ShortPage { page: 1 });
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use crate::RemoteItem;
use crate::fetcher::{PageFetcher, PageRequest};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default number of retries for a failing page.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default fixed delay between retries of the same page.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Options controlling one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Items requested per page. Values below 1 are treated as 1.
    pub per_page: u32,
    /// Query filter sent with every page request.
    pub filter: BTreeMap<String, String>,
    /// Extra attempts for a page whose failure is recoverable.
    pub max_retries: u32,
    /// Fixed wait before each retry.
    pub retry_delay: Duration,
    /// Stop after this many pages even if the last one was full.
    pub max_pages: Option<u32>,
}

impl AggregateOptions {
    /// Options with `per_page` and the default retry policy.
    #[must_use]
    pub const fn new(per_page: u32) -> Self {
        Self {
            per_page,
            filter: BTreeMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_pages: None,
        }
    }

    /// Set the query filter.
    #[must_use]
    pub fn with_filter(mut self, filter: BTreeMap<String, String>) -> Self {
        self.filter = filter;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Cap the number of pages requested.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page returned fewer items than requested.
    ShortPage {
        /// Index of the short page.
        page: u32,
    },
    /// A page returned no items at all.
    EmptyPage {
        /// Index of the empty page.
        page: u32,
    },
    /// A page kept failing; the result holds everything before it.
    FetchFailed {
        /// Index of the failed page.
        page: u32,
        /// Display form of the last error.
        error: String,
    },
    /// `max_pages` full pages were read.
    PageLimit {
        /// The configured cap.
        max_pages: u32,
    },
}

impl StopReason {
    /// Whether the collection was read to its end.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::ShortPage { .. } | Self::EmptyPage { .. })
    }
}

/// Result of an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// All items, in page order then endpoint order.
    pub items: Vec<RemoteItem>,
    /// Pages that contributed items.
    pub pages: u32,
    /// Fetch attempts made, retries included.
    pub fetch_calls: u32,
    /// Why the loop ended.
    pub stop: StopReason,
}

/// Drive `fetcher` from page 1 until the collection is exhausted.
///
/// Never returns an error: a page that fails after `max_retries` retries (or
/// fails with a non-recoverable error) ends the loop with the items gathered
/// so far.
#[instrument(skip_all, fields(per_page = options.per_page))]
pub async fn aggregate<F: PageFetcher + ?Sized>(fetcher: &F, options: &AggregateOptions) -> Aggregation {
    let per_page = options.per_page.max(1);
    let per_page_len = usize::try_from(per_page).unwrap_or(usize::MAX);

    let mut items = Vec::new();
    let mut pages = 0;
    let mut fetch_calls = 0;
    let mut page_index = 1;

    let stop = loop {
        if let Some(max_pages) = options.max_pages {
            if pages >= max_pages {
                warn!(max_pages, "page limit reached before end of collection");
                break StopReason::PageLimit { max_pages };
            }
        }

        let request = PageRequest::new(page_index, per_page).with_filter(options.filter.clone());
        let mut attempt = 0;
        let result = loop {
            fetch_calls += 1;
            match fetcher.fetch_page(&request).await {
                Ok(page) => break Ok(page),
                Err(e) if e.is_recoverable() && attempt < options.max_retries => {
                    attempt += 1;
                    warn!(
                        page = page_index,
                        attempt,
                        error = %e,
                        "page fetch failed, retrying"
                    );
                    tokio::time::sleep(options.retry_delay).await;
                },
                Err(e) => break Err(e),
            }
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    page = page_index,
                    error = %e,
                    category = e.category(),
                    collected = items.len(),
                    "stopping pagination early"
                );
                break StopReason::FetchFailed {
                    page: page_index,
                    error: e.to_string(),
                };
            },
        };

        let count = page.raw_count;
        debug!(page = page_index, count, "page received");

        if count == 0 {
            break StopReason::EmptyPage { page: page_index };
        }

        items.extend(page.items);
        pages += 1;

        if count < per_page_len {
            break StopReason::ShortPage { page: page_index };
        }
        page_index += 1;
    };

    info!(items = items.len(), pages, fetch_calls, ?stop, "collection aggregated");

    Aggregation {
        items,
        pages,
        fetch_calls,
        stop,
    }
}
