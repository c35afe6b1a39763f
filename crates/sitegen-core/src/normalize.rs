//! Entry normalization: remote items to canonical sitemap entries.

use crate::types::root_path;
use crate::{CanonicalEntry, ChangeFrequency, Error, Priority, RemoteItem, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced by the item slug in a [`PathTemplate`].
pub const SLUG_PLACEHOLDER: &str = "{slug}";

/// A path pattern such as `/blogs/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathTemplate(String);

impl PathTemplate {
    /// Parse a template; it must contain `{slug}` and is rooted at `/`.
    pub fn new(template: &str) -> Result<Self> {
        if !template.contains(SLUG_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "path template '{template}' must contain {SLUG_PLACEHOLDER}"
            )));
        }
        Ok(Self(root_path(template)))
    }

    /// Substitute `slug` into the template.
    #[must_use]
    pub fn render(&self, slug: &str) -> String {
        self.0.replace(SLUG_PLACEHOLDER, slug)
    }
}

impl TryFrom<String> for PathTemplate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<PathTemplate> for String {
    fn from(template: PathTemplate) -> Self {
        template.0
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-category constants applied to every entry of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntryProfile {
    /// Change frequency for every entry.
    pub change_frequency: ChangeFrequency,
    /// Priority for every entry.
    pub priority: Priority,
}

/// Maps remote items of one collection to canonical entries.
#[derive(Debug, Clone)]
pub struct Normalizer {
    template: PathTemplate,
    profile: EntryProfile,
    today: NaiveDate,
}

impl Normalizer {
    /// Normalizer that falls back to today's UTC date.
    #[must_use]
    pub fn new(template: PathTemplate, profile: EntryProfile) -> Self {
        Self::with_today(template, profile, Utc::now().date_naive())
    }

    /// Normalizer with an explicit fallback date.
    #[must_use]
    pub const fn with_today(template: PathTemplate, profile: EntryProfile, today: NaiveDate) -> Self {
        Self {
            template,
            profile,
            today,
        }
    }

    /// Normalize one item; `None` when it has no slug.
    ///
    /// The date comes from `updated_at`, then `created_at`, then the fallback
    /// date; a timestamp that does not parse counts as absent.
    #[must_use]
    pub fn normalize(&self, item: &RemoteItem) -> Option<CanonicalEntry> {
        let slug = item.slug.as_deref()?.trim().trim_matches('/');
        if slug.is_empty() {
            return None;
        }

        let last_modified = item
            .updated_at
            .as_deref()
            .and_then(parse_date)
            .or_else(|| item.created_at.as_deref().and_then(parse_date))
            .unwrap_or(self.today);

        Some(CanonicalEntry::new(
            self.template.render(slug),
            last_modified,
            self.profile.change_frequency,
            self.profile.priority,
        ))
    }

    /// Normalize a sequence, preserving order and skipping slug-less items.
    pub fn normalize_all<'a, I>(&self, items: I) -> Vec<CanonicalEntry>
    where
        I: IntoIterator<Item = &'a RemoteItem>,
    {
        items.into_iter().filter_map(|item| self.normalize(item)).collect()
    }
}

/// Parse a timestamp into its calendar date.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00Z`, `2024-01-05T10:00:00.000000Z`,
/// with offsets), `2024-01-05 10:00:00` and bare `2024-01-05`. The date is
/// taken in UTC for zoned timestamps.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
