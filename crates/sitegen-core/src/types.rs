//! Core data types shared by the crawl, merge and emit stages.
//!
//! The pipeline moves data in one direction:
//!
//! ```text
//! JSON page ──► RemoteItem ──► CanonicalEntry ──► sitemap.xml / URL list
//! ```
//!
//! [`RemoteItem`] is deliberately lenient: the collection endpoints are not
//! ours, so anything we cannot read becomes an absent field rather than a
//! failed page. [`CanonicalEntry`] is strict: every entry that reaches an
//! emitter has a rooted path, a calendar date, a change frequency and a
//! priority inside `[0.0, 1.0]`.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A record returned by a remote collection endpoint.
///
/// Only the slug and the two timestamps matter for sitemap generation; the
/// rest of the record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteItem {
    /// Unique identifier used to build the page path. Blank slugs are `None`.
    pub slug: Option<String>,
    /// Raw creation timestamp, unparsed.
    pub created_at: Option<String>,
    /// Raw update timestamp, unparsed.
    pub updated_at: Option<String>,
}

impl RemoteItem {
    /// Build an item from one element of a collection page.
    ///
    /// Reads `slug`, `updatedAt` / `updated_at` and `createdAt` /
    /// `created_at`. Values that are not strings (or are blank) are treated as
    /// absent; a non-object element yields an item with no slug, which the
    /// normalizer later drops.
    ///
    /// ```
    /// use sitegen_core::RemoteItem;
    /// use serde_json::json;
    ///
    /// let item = RemoteItem::from_value(&json!({
    ///     "slug": "launch-recap",
    ///     "created_at": "2024-01-05T00:00:00Z",
    ///     "updatedAt": null
    /// }));
    /// assert_eq!(item.slug.as_deref(), Some("launch-recap"));
    /// assert_eq!(item.created_at.as_deref(), Some("2024-01-05T00:00:00Z"));
    /// assert!(item.updated_at.is_none());
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| object.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        Self {
            slug: text(&["slug"]),
            created_at: text(&["createdAt", "created_at"]),
            updated_at: text(&["updatedAt", "updated_at"]),
        }
    }
}

/// Change frequency hints from the sitemap protocol.
///
/// The agency site authors `weekly`, `monthly` and `yearly`; the remaining
/// values are accepted so a config file can use any value the protocol allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    #[default]
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// Lowercase protocol spelling, as written into `<changefreq>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(Error::Parse(format!("Invalid changefreq value: {s}"))),
        }
    }
}

/// Sitemap priority, always inside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Priority(f32);

impl Priority {
    /// Default priority for entries derived from a remote collection.
    pub const DYNAMIC_DEFAULT: Self = Self(0.6);

    /// Create a priority, clamping finite values into `[0.0, 1.0]`.
    ///
    /// Returns an error for NaN or infinite input.
    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() {
            Ok(Self(value.clamp(0.0, 1.0)))
        } else {
            Err(Error::Config(format!("priority must be a finite number, got {value}")))
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DYNAMIC_DEFAULT
    }
}

impl TryFrom<f32> for Priority {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for f32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    /// Formats with at least one decimal (`1.0`, `0.6`, `0.85`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.2}", self.0);
        let trimmed = fixed.trim_end_matches('0');
        if trimmed.ends_with('.') {
            write!(f, "{trimmed}0")
        } else {
            f.write_str(trimmed)
        }
    }
}

/// The normalized output unit consumed by every emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    /// Site-relative path, always starting with `/`.
    pub path: String,
    /// Calendar date of the last modification.
    pub last_modified: NaiveDate,
    /// How frequently the page changes.
    pub change_frequency: ChangeFrequency,
    /// Priority relative to the other pages of the site.
    pub priority: Priority,
}

impl CanonicalEntry {
    /// Create an entry, rooting `path` at `/` if needed.
    pub fn new(
        path: impl Into<String>,
        last_modified: NaiveDate,
        change_frequency: ChangeFrequency,
        priority: Priority,
    ) -> Self {
        Self {
            path: root_path(&path.into()),
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Ensure a site path starts with `/`.
pub(crate) fn root_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
