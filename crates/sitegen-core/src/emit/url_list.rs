//! URL path lists for the pre-render tool's include setting.

use crate::CanonicalEntry;
use std::collections::HashSet;

/// Ordered set union of `always_include` and the entry paths.
///
/// Paths from `always_include` come first, in the given order, followed by
/// entry paths not already listed, in entry order. Paths are emitted without
/// a host.
///
/// ```
/// use chrono::NaiveDate;
/// use sitegen_core::emit::url_list::merge_url_list;
/// use sitegen_core::{CanonicalEntry, ChangeFrequency, Priority};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let entries: Vec<_> = ["/showcase/x", "/blogs"]
///     .into_iter()
///     .map(|p| CanonicalEntry::new(p, day, ChangeFrequency::Weekly, Priority::default()))
///     .collect();
///
/// let list = merge_url_list(&["/".to_string(), "/blogs".to_string()], &entries);
/// assert_eq!(list, ["/", "/blogs", "/showcase/x"]);
/// ```
#[must_use]
pub fn merge_url_list(always_include: &[String], entries: &[CanonicalEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    always_include
        .iter()
        .map(String::as_str)
        .chain(entries.iter().map(|entry| entry.path.as_str()))
        .filter(|path| seen.insert(*path))
        .map(ToString::to_string)
        .collect()
}

/// Render a URL list as one path per line.
#[must_use]
pub fn render_url_list(paths: &[String]) -> String {
    let mut out = paths.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
