//! # sitegen-core
//!
//! Core functionality for sitegen - the build-time tool that turns the agency
//! API's paginated collections into a `sitemap.xml` and a pre-render route
//! list.
//!
//! ## Architecture
//!
//! A run flows through five stages:
//!
//! - **Fetching**: [`fetcher::PageFetcher`] retrieves one page of a collection
//! - **Aggregation**: [`aggregate::aggregate`] walks pages until a short or empty one
//! - **Normalization**: [`normalize::Normalizer`] maps remote items to [`CanonicalEntry`]
//! - **Merging**: [`merge_entries`] puts the static pages first and keeps paths unique
//! - **Emission**: [`emit`] renders sitemap XML or a URL list and writes it once
//!
//! [`pipeline::collect_entries`] runs the first four for every configured
//! collection; [`prerender`] wraps the pre-render tool in a config-file
//! transaction.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sitegen_core::{CanonicalEntry, ChangeFrequency, Priority, merge_entries};
//! use sitegen_core::emit::{SiteUrl, render_sitemap};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! let statics = vec![CanonicalEntry::new("/", day, ChangeFrequency::Weekly, Priority::new(1.0)?)];
//! let dynamic = vec![CanonicalEntry::new("/blogs/a", day, ChangeFrequency::Weekly, Priority::default())];
//!
//! let entries = merge_entries(statics, dynamic);
//! let xml = render_sitemap(&entries, &SiteUrl::parse("https://agency.example")?)?;
//! assert!(xml.contains("<loc>https://agency.example/blogs/a</loc>"));
//! # Ok::<(), sitegen_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. Fetch failures never
//! surface from the aggregation loop; they end pagination early and are
//! reported through [`aggregate::StopReason`].

/// Pagination loop over a page fetcher
pub mod aggregate;
/// Configuration file loading and validation
pub mod config;
/// Sitemap and URL-list rendering, plus atomic output writes
pub mod emit;
/// Response envelope unwrapping
pub mod envelope;
/// Error types and result aliases
pub mod error;
/// Page fetching over HTTP
pub mod fetcher;
/// Static-first, path-unique merging
pub mod merge;
/// Remote item to canonical entry mapping
pub mod normalize;
/// Collection crawling across all configured collections
pub mod pipeline;
/// Pre-render include list transaction
pub mod prerender;
/// Built-in hand-authored pages
pub mod static_pages;
/// Core data types
pub mod types;

pub use aggregate::{AggregateOptions, Aggregation, StopReason, aggregate};
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use fetcher::{HttpPageFetcher, Page, PageFetcher, PageRequest};
pub use merge::merge_entries;
pub use normalize::{EntryProfile, Normalizer, PathTemplate};
pub use pipeline::{Collected, CollectionReport, collect_entries, collect_from_api};
pub use types::*;
