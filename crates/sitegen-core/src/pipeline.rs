//! End-to-end entry collection: crawl every collection, normalize, merge.

use crate::aggregate::{StopReason, aggregate};
use crate::config::{CollectionConfig, SiteConfig};
use crate::fetcher::{HttpPageFetcher, PageFetcher, build_client};
use crate::merge::merge_entries;
use crate::normalize::Normalizer;
use crate::{CanonicalEntry, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Outcome of crawling one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    /// Collection name from the config.
    pub name: String,
    /// Entries produced.
    pub entries: usize,
    /// Items dropped for lack of a slug.
    pub skipped: usize,
    /// Pages that contributed items.
    pub pages: u32,
    /// Fetch attempts, retries included.
    pub fetch_calls: u32,
    /// Why pagination ended.
    pub stop: StopReason,
}

/// Everything a run collected.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Static entries followed by non-colliding dynamic entries.
    pub entries: Vec<CanonicalEntry>,
    /// Dynamic entries only, in fetch order, before merging.
    pub dynamic: Vec<CanonicalEntry>,
    /// Number of static entries in the merge.
    pub static_count: usize,
    /// Per-collection outcomes, in crawl order.
    pub collections: Vec<CollectionReport>,
}

impl Collected {
    /// Whether every collection was read to its end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.collections.iter().all(|c| c.stop.is_complete())
    }
}

/// Crawl every configured collection and merge the result with the static set.
///
/// Collections run one after another; `fetcher_for` supplies the page source
/// of each. A collection that fails part way contributes what it got before
/// the failure. Only an error from `fetcher_for` itself aborts the run.
pub async fn collect_entries<F, M>(
    config: &SiteConfig,
    today: NaiveDate,
    mut fetcher_for: M,
) -> Result<Collected>
where
    F: PageFetcher,
    M: FnMut(&CollectionConfig) -> Result<F>,
{
    let mut dynamic = Vec::new();
    let mut collections = Vec::with_capacity(config.collections.len());

    for collection in &config.collections {
        let fetcher = fetcher_for(collection)?;
        let options = config.aggregate_options(collection);
        let aggregation = aggregate(&fetcher, &options).await;

        let normalizer =
            Normalizer::with_today(collection.path_template.clone(), collection.profile(), today);
        let entries = normalizer.normalize_all(&aggregation.items);
        let skipped = aggregation.items.len() - entries.len();
        if skipped > 0 {
            warn!(collection = %collection.name, skipped, "items without a slug were dropped");
        }
        if !aggregation.stop.is_complete() {
            warn!(
                collection = %collection.name,
                stop = ?aggregation.stop,
                "collection is incomplete"
            );
        }

        collections.push(CollectionReport {
            name: collection.name.clone(),
            entries: entries.len(),
            skipped,
            pages: aggregation.pages,
            fetch_calls: aggregation.fetch_calls,
            stop: aggregation.stop,
        });
        dynamic.extend(entries);
    }

    let statics = config.static_entries(today);
    let static_count = statics.len();
    let entries = merge_entries(statics, dynamic.iter().cloned());
    info!(
        static_count,
        dynamic = dynamic.len(),
        total = entries.len(),
        "entries merged"
    );

    Ok(Collected {
        entries,
        dynamic,
        static_count,
        collections,
    })
}

/// [`collect_entries`] against the configured API, over one shared client.
pub async fn collect_from_api(config: &SiteConfig, today: NaiveDate) -> Result<Collected> {
    let client = build_client(config.request_timeout())?;
    collect_entries(config, today, |collection| {
        let endpoint = config.collection_url(collection)?;
        Ok(HttpPageFetcher::with_client(client.clone(), endpoint))
    })
    .await
}
