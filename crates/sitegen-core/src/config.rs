//! Configuration for sitemap and pre-render runs.
//!
//! Configuration is read from a TOML file (`sitegen.toml` in the working
//! directory unless a path is given). Every section is optional; missing
//! values fall back to the agency site's defaults, so a bare checkout can run
//! with nothing but the API URL in the environment.
//!
//! ## Resolution order
//!
//! 1. Built-in defaults
//! 2. `sitegen.toml` (or the explicit `--config` file)
//! 3. `SITEGEN_API_URL`, applied by the CLI through [`SiteConfig::with_api_url`]
//!
//! ## Example
//!
//! ```toml
//! [site]
//! base_url = "https://agency.example"
//!
//! [api]
//! base_url = "https://api.agency.example/api"
//! per_page = 100
//! locale = "en"
//! timeout_secs = 15
//! max_retries = 1
//! retry_delay_ms = 1000
//!
//! [[collections]]
//! name = "blogs"
//! endpoint = "blogs"
//! path_template = "/blogs/{slug}"
//!
//! [[static_entries]]
//! path = "/"
//! changefreq = "weekly"
//! priority = 1.0
//!
//! [sitemap]
//! output = "public/sitemap.xml"
//!
//! [prerender]
//! config_file = "package.json"
//! include_field = "reactSnap.include"
//! always_include = ["/", "/contact"]
//! command = ["npx", "react-snap"]
//! ```

use crate::aggregate::AggregateOptions;
use crate::emit::SiteUrl;
use crate::normalize::{EntryProfile, PathTemplate};
use crate::static_pages::DEFAULT_STATIC_PAGES;
use crate::{CanonicalEntry, ChangeFrequency, Error, Priority, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sitegen.toml";

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "SITEGEN_API_URL";

/// `site.base_url` used when the config names none. Never the real site.
pub const PLACEHOLDER_SITE_URL: &str = "https://example.com";

/// Complete run configuration.
///
/// [`Default`] is the agency site: the blog and showcase collections plus
/// the built-in static pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public site settings.
    pub site: SiteSettings,
    /// Remote API settings shared by all collections.
    pub api: ApiConfig,
    /// Remote collections turned into dynamic entries, crawled in order.
    pub collections: Vec<CollectionConfig>,
    /// Hand-authored pages; replaces the built-in list when present.
    pub static_entries: Vec<StaticEntryConfig>,
    /// Sitemap output settings.
    pub sitemap: SitemapConfig,
    /// Pre-render settings.
    pub prerender: PrerenderConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSettings::default(),
            api: ApiConfig::default(),
            collections: default_collections(),
            static_entries: default_static_entries(),
            sitemap: SitemapConfig::default(),
            prerender: PrerenderConfig::default(),
        }
    }
}

/// Public site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Origin prepended to every `<loc>`.
    pub base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: PLACEHOLDER_SITE_URL.to_string(),
        }
    }
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the collection endpoints are resolved against.
    pub base_url: String,
    /// Default page size.
    pub per_page: u32,
    /// Language filter sent as `lang`; omitted when unset.
    pub locale: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for a page failing with a transient error.
    pub max_retries: u32,
    /// Fixed delay between retries, in milliseconds.
    pub retry_delay_ms: u64,
    /// Optional cap on pages per collection.
    pub max_pages: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            per_page: 100,
            locale: Some("en".to_string()),
            timeout_secs: 15,
            max_retries: 1,
            retry_delay_ms: 1000,
            max_pages: None,
        }
    }
}

/// One remote collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Label used in logs and summaries.
    pub name: String,
    /// Endpoint path relative to `api.base_url`.
    pub endpoint: String,
    /// Site path pattern, e.g. `/blogs/{slug}`.
    pub path_template: PathTemplate,
    /// Change frequency for every entry.
    #[serde(default)]
    pub changefreq: ChangeFrequency,
    /// Priority for every entry.
    #[serde(default)]
    pub priority: Priority,
    /// Page size override for this collection.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl CollectionConfig {
    /// Entry profile for the normalizer.
    #[must_use]
    pub const fn profile(&self) -> EntryProfile {
        EntryProfile {
            change_frequency: self.changefreq,
            priority: self.priority,
        }
    }
}

/// One hand-authored page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticEntryConfig {
    /// Site path.
    pub path: String,
    /// Authored change frequency.
    pub changefreq: ChangeFrequency,
    /// Authored priority.
    pub priority: Priority,
    /// Authored modification date; the run date when absent.
    #[serde(default)]
    pub lastmod: Option<NaiveDate>,
}

/// Sitemap output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Destination file.
    pub output: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("public/sitemap.xml"),
        }
    }
}

/// Pre-render settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// JSON file holding the include list.
    pub config_file: PathBuf,
    /// Dotted path of the include list inside `config_file`.
    pub include_field: String,
    /// Paths always rendered, listed before crawled ones.
    pub always_include: Vec<String>,
    /// Program and arguments of the pre-render tool.
    pub command: Vec<String>,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("package.json"),
            include_field: "reactSnap.include".to_string(),
            always_include: vec!["/".to_string(), "/contact".to_string()],
            command: vec!["npx".to_string(), "react-snap".to_string()],
        }
    }
}

fn default_collections() -> Vec<CollectionConfig> {
    [("blogs", "blogs", "/blogs/{slug}"), ("showcase", "showcase", "/showcase/{slug}")]
        .into_iter()
        .filter_map(|(name, endpoint, template)| {
            Some(CollectionConfig {
                name: name.to_string(),
                endpoint: endpoint.to_string(),
                path_template: PathTemplate::new(template).ok()?,
                changefreq: ChangeFrequency::Weekly,
                priority: Priority::DYNAMIC_DEFAULT,
                per_page: None,
            })
        })
        .collect()
}

fn default_static_entries() -> Vec<StaticEntryConfig> {
    DEFAULT_STATIC_PAGES
        .iter()
        .map(|&(path, changefreq, priority)| StaticEntryConfig {
            path: path.to_string(),
            changefreq,
            priority: Priority::new(priority).unwrap_or_default(),
            lastmod: None,
        })
        .collect()
}

impl SiteConfig {
    /// Load configuration.
    ///
    /// With `Some(path)` the file must exist. With `None`, `sitegen.toml` in
    /// the working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Replace `api.base_url` when `url` is set and non-blank.
    #[must_use]
    pub fn with_api_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api.base_url = url.to_string();
        }
        self
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        SiteUrl::parse(&self.site.base_url)
            .map_err(|e| Error::Config(format!("site.base_url: {e}")))?;
        self.api_base()?;
        if self.api.per_page == 0 {
            return Err(Error::Config("api.per_page must be at least 1".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".to_string()));
        }
        for collection in &self.collections {
            if collection.per_page == Some(0) {
                return Err(Error::Config(format!(
                    "collections.{}.per_page must be at least 1",
                    collection.name
                )));
            }
        }
        if self.static_entries.len() > 50 {
            return Err(Error::Config(format!(
                "static_entries has {} pages; the static set is limited to 50",
                self.static_entries.len()
            )));
        }
        if self.prerender.include_field.split('.').any(str::is_empty) {
            return Err(Error::Config(format!(
                "prerender.include_field '{}' is not a dotted field path",
                self.prerender.include_field
            )));
        }
        Ok(())
    }

    /// Whether `site.base_url` is still the placeholder origin.
    #[must_use]
    pub fn uses_placeholder_site_url(&self) -> bool {
        self.site.base_url.trim().trim_end_matches('/') == PLACEHOLDER_SITE_URL
    }

    /// Parsed public site origin.
    pub fn site_url(&self) -> Result<SiteUrl> {
        SiteUrl::parse(&self.site.base_url)
    }

    /// Parsed API base, normalized to end with `/` so endpoints join under it.
    pub fn api_base(&self) -> Result<Url> {
        let raw = self.api.base_url.trim();
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&with_slash).map_err(|e| Error::Config(format!("api.base_url '{raw}': {e}")))
    }

    /// Absolute endpoint URL of a collection.
    pub fn collection_url(&self, collection: &CollectionConfig) -> Result<Url> {
        Ok(self.api_base()?.join(collection.endpoint.trim_start_matches('/'))?)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Aggregation options for a collection.
    #[must_use]
    pub fn aggregate_options(&self, collection: &CollectionConfig) -> AggregateOptions {
        let mut filter = BTreeMap::new();
        if let Some(locale) = self.api.locale.as_deref().filter(|l| !l.is_empty()) {
            filter.insert("lang".to_string(), locale.to_string());
        }
        AggregateOptions::new(collection.per_page.unwrap_or(self.api.per_page))
            .with_filter(filter)
            .with_retries(
                self.api.max_retries,
                Duration::from_millis(self.api.retry_delay_ms),
            )
            .with_max_pages(self.api.max_pages)
    }

    /// Static entries as canonical entries, dated `today` unless authored.
    #[must_use]
    pub fn static_entries(&self, today: NaiveDate) -> Vec<CanonicalEntry> {
        self.static_entries
            .iter()
            .map(|page| {
                CanonicalEntry::new(
                    page.path.as_str(),
                    page.lastmod.unwrap_or(today),
                    page.changefreq,
                    page.priority,
                )
            })
            .collect()
    }
}
