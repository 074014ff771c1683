//! Response-shape adapter for list endpoints.
//!
//! The endpoints disagree on where the rows array lives. Each screen declares
//! the keys to try; the first key holding an array wins. A bare array body is
//! accepted as well. Anything else yields an empty page, never an error.

#![forbid(unsafe_code)]

use precast_core::page::{ListPage, PageEnvelope};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub fn normalize_list_response<R: DeserializeOwned>(raw: &Value, keys: &[&str]) -> ListPage<R> {
    let items: &[Value] = match raw {
        Value::Array(a) => a.as_slice(),
        Value::Object(_) => keys
            .iter()
            .find_map(|k| raw.get(*k).and_then(|v| v.as_array()))
            .map(|a| a.as_slice())
            .unwrap_or(&[]),
        _ => &[],
    };
    let mut rows = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for it in items {
        match R::deserialize(it) {
            Ok(r) => rows.push(r),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, kept = rows.len(), "normalize: rows did not match the expected shape");
    }
    let envelope = raw
        .get("pagination")
        .filter(|v| v.is_object())
        .and_then(|v| PageEnvelope::deserialize(v).ok());
    ListPage { rows, envelope }
}

#[cfg(test)]
mod tests {
    use super::*;
    use precast_core::rows::{ElementRow, ElementTypeRow, LogRow};
    use serde_json::json;

    const KEYS: &[&str] = &["data", "elements"];

    #[test]
    fn rows_under_data_with_envelope() {
        let raw = json!({
            "data": [{ "id": 1 }, { "id": 2 }],
            "pagination": { "current_page": 1, "total_pages": 3, "total_records": 25, "has_next": true, "has_prev": false, "page_size": 10 }
        });
        let p: ListPage<ElementRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 2);
        let env = p.envelope.unwrap();
        assert_eq!(env.total_records, 25);
        assert!(env.has_next);
    }

    #[test]
    fn falls_through_to_alternate_key() {
        // "data" present but not an array: keep looking
        let raw = json!({ "data": { "note": "x" }, "elements": [{ "id": 4 }] });
        let p: ListPage<ElementRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 1);
        assert_eq!(p.rows[0].id, 4);
        assert!(p.envelope.is_none());
    }

    #[test]
    fn bare_array_body() {
        let p: ListPage<ElementRow> = normalize_list_response(&json!([{ "id": 1 }]), KEYS);
        assert_eq!(p.rows.len(), 1);
    }

    #[test]
    fn unknown_shape_is_empty() {
        let p: ListPage<ElementRow> = normalize_list_response(&json!({ "items": [{ "id": 1 }] }), KEYS);
        assert!(p.rows.is_empty());
        let p: ListPage<ElementRow> = normalize_list_response(&Value::Null, KEYS);
        assert!(p.rows.is_empty());
    }

    #[test]
    fn malformed_rows_and_envelope_are_tolerated() {
        let raw = json!({ "data": [{ "id": 1 }, "junk", { "id": "x" }], "pagination": "n/a" });
        let p: ListPage<ElementRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 1);
        assert!(p.envelope.is_none());
    }

    #[test]
    fn null_fields_keep_the_row() {
        let raw = json!({ "data": [{ "id": 1, "floor_name": null, "element_id": null }, { "id": 2 }] });
        let p: ListPage<ElementRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.rows[0].floor_name, "");
    }

    #[test]
    fn rows_carrying_both_field_spellings_are_kept() {
        let raw = json!({ "data": [
            { "id": 3, "element_type_id": 3, "element_type": "Wall" },
            { "element_type_id": 4 }
        ]});
        let p: ListPage<ElementTypeRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.rows[1].type_id(), 4);

        let raw = json!({ "data": [{ "id": 1, "user": "ravi", "user_name": "ravi", "created_at": "a", "timestamp": "b" }] });
        let p: ListPage<LogRow> = normalize_list_response(&raw, KEYS);
        assert_eq!(p.rows.len(), 1);
    }
}
