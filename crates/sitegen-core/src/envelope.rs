//! Response envelope unwrapping for collection endpoints.
//!
//! The agency API has returned the same collection in three shapes over its
//! lifetime, depending on whether a resource wrapper and/or the paginator
//! wrapper were applied:
//!
//! | Priority | Shape                      | Example                          |
//! |----------|----------------------------|----------------------------------|
//! | 1        | bare array                 | `[{"slug": "a"}]`                |
//! | 2        | `data` array               | `{"data": [{"slug": "a"}]}`      |
//! | 3        | nested `data.data` array   | `{"data": {"data": [...]}}`      |
//!
//! Shapes are checked in that order and the first match wins. Anything else
//! is reported as `None` and the fetcher turns it into a parse error for the
//! page.

use serde_json::Value;

/// Locate the item array inside a collection response.
///
/// ```
/// use sitegen_core::envelope::unwrap_items;
/// use serde_json::json;
///
/// let body = json!({"data": {"data": [{"slug": "a"}], "current_page": 1}});
/// assert_eq!(unwrap_items(&body).map(<[_]>::len), Some(1));
///
/// assert!(unwrap_items(&json!({"items": []})).is_none());
/// ```
#[must_use]
pub fn unwrap_items(body: &Value) -> Option<&[Value]> {
    if let Value::Array(items) = body {
        return Some(items.as_slice());
    }

    let data = body.get("data")?;
    if let Value::Array(items) = data {
        return Some(items.as_slice());
    }

    match data.get("data") {
        Some(Value::Array(items)) => Some(items.as_slice()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let body = json!([{"slug": "a"}, {"slug": "b"}]);
        assert_eq!(unwrap_items(&body).unwrap().len(), 2);
    }

    #[test]
    fn test_data_array() {
        let body = json!({"data": [{"slug": "a"}], "meta": {"total": 1}});
        assert_eq!(unwrap_items(&body).unwrap()[0]["slug"], "a");
    }

    #[test]
    fn test_nested_data_array() {
        let body = json!({"data": {"data": [{"slug": "x"}], "per_page": 100}});
        assert_eq!(unwrap_items(&body).unwrap()[0]["slug"], "x");
    }

    #[test]
    fn test_outer_data_array_wins_over_nested() {
        // An array at `data` is taken as-is even if its elements carry `data`.
        let body = json!({"data": [{"data": [1, 2, 3]}]});
        assert_eq!(unwrap_items(&body).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_arrays_are_valid() {
        assert_eq!(unwrap_items(&json!([])).unwrap().len(), 0);
        assert_eq!(unwrap_items(&json!({"data": []})).unwrap().len(), 0);
        assert_eq!(unwrap_items(&json!({"data": {"data": []}})).unwrap().len(), 0);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(unwrap_items(&json!({"data": null})).is_none());
        assert!(unwrap_items(&json!({"data": {"items": []}})).is_none());
        assert!(unwrap_items(&json!({"data": {"data": "nope"}})).is_none());
        assert!(unwrap_items(&json!("text")).is_none());
        assert!(unwrap_items(&json!(null)).is_none());
    }
}
