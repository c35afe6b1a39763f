//! Merging the static page set with dynamic collection entries.

use crate::CanonicalEntry;
use std::collections::HashSet;

/// Merge static and dynamic entries into one path-unique sequence.
///
/// Static entries come first in authored order, then dynamic entries in fetch
/// order. A dynamic entry whose path is already present is dropped, so a
/// static entry always wins over a dynamic one with the same path. Repeated
/// paths inside either input keep their first occurrence.
///
/// ```
/// use chrono::NaiveDate;
/// use sitegen_core::{CanonicalEntry, ChangeFrequency, Priority, merge_entries};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let entry = |path: &str, priority: f32| {
///     CanonicalEntry::new(path, day, ChangeFrequency::Weekly, Priority::new(priority).unwrap())
/// };
///
/// let merged = merge_entries(
///     vec![entry("/", 1.0), entry("/blogs", 0.8)],
///     vec![entry("/blogs", 0.6), entry("/blogs/a", 0.6)],
/// );
/// let paths: Vec<_> = merged.iter().map(|e| e.path.as_str()).collect();
/// assert_eq!(paths, ["/", "/blogs", "/blogs/a"]);
/// assert_eq!(merged[1].priority.value(), 0.8);
/// ```
pub fn merge_entries<S, D>(static_entries: S, dynamic_entries: D) -> Vec<CanonicalEntry>
where
    S: IntoIterator<Item = CanonicalEntry>,
    D: IntoIterator<Item = CanonicalEntry>,
{
    let mut seen = HashSet::new();
    static_entries
        .into_iter()
        .chain(dynamic_entries)
        .filter(|entry| seen.insert(entry.path.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{ChangeFrequency, Priority};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entry(path: &str, freq: ChangeFrequency) -> CanonicalEntry {
        CanonicalEntry::new(
            path,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            freq,
            Priority::default(),
        )
    }

    #[test]
    fn test_static_wins_on_collision() {
        let merged = merge_entries(
            vec![entry("/work", ChangeFrequency::Monthly)],
            vec![entry("/work", ChangeFrequency::Weekly)],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].change_frequency, ChangeFrequency::Monthly);
    }

    #[test]
    fn test_order_is_static_then_dynamic() {
        let merged = merge_entries(
            vec![entry("/", ChangeFrequency::Weekly), entry("/about", ChangeFrequency::Yearly)],
            vec![entry("/blogs/b", ChangeFrequency::Weekly), entry("/blogs/a", ChangeFrequency::Weekly)],
        );
        let paths: Vec<_> = merged.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/", "/about", "/blogs/b", "/blogs/a"]);
    }

    #[test]
    fn test_duplicate_dynamic_entries_collapse() {
        let merged = merge_entries(
            Vec::new(),
            vec![entry("/blogs/a", ChangeFrequency::Weekly), entry("/blogs/a", ChangeFrequency::Daily)],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].change_frequency, ChangeFrequency::Weekly);
    }

    proptest! {
        #[test]
        fn prop_output_paths_unique_and_bounded(
            statics in proptest::collection::vec("/[a-c]{0,2}", 0..10),
            dynamics in proptest::collection::vec("/[a-c]{0,2}", 0..30),
        ) {
            let s: Vec<_> = statics.iter().map(|p| entry(p, ChangeFrequency::Monthly)).collect();
            let d: Vec<_> = dynamics.iter().map(|p| entry(p, ChangeFrequency::Weekly)).collect();
            let merged = merge_entries(s.clone(), d.clone());

            prop_assert!(merged.len() <= s.len() + d.len());
            let unique: HashSet<_> = merged.iter().map(|e| e.path.clone()).collect();
            prop_assert_eq!(unique.len(), merged.len());

            // Every static path appears with its static value.
            for e in &merged {
                if statics.contains(&e.path) {
                    prop_assert_eq!(e.change_frequency, ChangeFrequency::Monthly);
                }
            }
        }
    }
}
