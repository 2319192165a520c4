//! Conversion of one source record into a destination creation request.

use tracing::debug;

use crate::defaults::{BODY_HEADROOM, LABEL_MAX_CHARS, LARGE_BODY_THRESHOLD};
use crate::models::{NewRecord, SourceRecord, TagId};
use crate::tags::TagMap;
use crate::title::split_title;

/// A creation request plus the label used when logging the record.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRecord {
    pub request: NewRecord,
    pub label: String,
}

/// Build the destination request for `record`.
///
/// Tag names without a match in `tags` are dropped.
pub fn transform_record(record: &SourceRecord, tags: &TagMap) -> TransformedRecord {
    let (title, body) = split_title(&record.content);

    let tag_ids: Vec<TagId> = record
        .tags
        .iter()
        .filter_map(|name| {
            let id = tags.get(name);
            if id.is_none() {
                debug!(tag = %name, record = %record.name, "Dropping unresolved tag");
            }
            id
        })
        .collect();

    let capacity = capacity_override(body.len());
    if let Some(capacity) = capacity {
        debug!(record = %record.name, body_len = body.len(), capacity, "Raising record capacity");
    }

    TransformedRecord {
        label: display_label(title, &record.snippet),
        request: NewRecord {
            title: title.to_string(),
            body: body.to_string(),
            pinned: record.pinned,
            tag_ids,
            capacity,
            created_at: record.created_at,
            updated_at: record.updated_at,
        },
    }
}

/// Capacity to request for a body of `body_len` bytes, if the destination
/// default is too small.
pub fn capacity_override(body_len: usize) -> Option<usize> {
    (body_len > LARGE_BODY_THRESHOLD).then_some(body_len + BODY_HEADROOM)
}

/// The title if present, else the preview truncated to 50 characters.
pub fn display_label(title: &str, snippet: &str) -> String {
    if !title.is_empty() {
        return title.to_string();
    }
    match snippet.char_indices().nth(LABEL_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &snippet[..cut]),
        None => snippet.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::record;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_title_and_body_split() {
        let r = record("memos/1", "# My Title\nbody text");
        let t = transform_record(&r, &TagMap::new());
        assert_eq!(t.request.title, "My Title");
        assert_eq!(t.request.body, "body text");
        assert_eq!(t.label, "My Title");
    }

    #[test]
    fn test_resolves_tags_case_insensitively_and_drops_unknown() {
        let mut tags = TagMap::new();
        tags.insert("idea", 7);
        tags.insert("work", 9);

        let mut r = record("memos/1", "text");
        r.tags = vec!["Idea".to_string(), "missing".to_string(), "WORK".to_string()];

        let t = transform_record(&r, &tags);
        assert_eq!(t.request.tag_ids, vec![7, 9]);
    }

    #[test]
    fn test_passes_flags_and_timestamps_through() {
        let created = Utc.with_ymd_and_hms(2023, 5, 1, 8, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2023, 6, 2, 9, 0, 0).unwrap();
        let mut r = record("memos/1", "text");
        r.pinned = true;
        r.created_at = Some(created);
        r.updated_at = Some(updated);

        let t = transform_record(&r, &TagMap::new());
        assert!(t.request.pinned);
        assert_eq!(t.request.created_at, Some(created));
        assert_eq!(t.request.updated_at, Some(updated));
    }

    #[test]
    fn test_capacity_threshold() {
        assert_eq!(capacity_override(0), None);
        assert_eq!(capacity_override(LARGE_BODY_THRESHOLD), None);
        assert_eq!(
            capacity_override(LARGE_BODY_THRESHOLD + 1),
            Some(LARGE_BODY_THRESHOLD + 1 + BODY_HEADROOM)
        );
    }

    #[test]
    fn test_large_body_requests_capacity() {
        let r = record("memos/1", &"x".repeat(40_000));
        let t = transform_record(&r, &TagMap::new());
        assert_eq!(t.request.capacity, Some(41_024));
    }

    #[test]
    fn test_capacity_measures_body_not_title() {
        let content = format!("# Title\n{}", "y".repeat(LARGE_BODY_THRESHOLD));
        let t = transform_record(&record("memos/1", &content), &TagMap::new());
        assert_eq!(t.request.capacity, None);
    }

    #[test]
    fn test_label_falls_back_to_snippet() {
        assert_eq!(display_label("", "short preview"), "short preview");
    }

    #[test]
    fn test_label_truncates_long_snippet() {
        let snippet = "a".repeat(60);
        let label = display_label("", &snippet);
        assert_eq!(label, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_label_exactly_at_limit_is_not_truncated() {
        let snippet = "b".repeat(50);
        assert_eq!(display_label("", &snippet), snippet);
    }

    #[test]
    fn test_label_truncation_respects_char_boundaries() {
        let snippet = "é".repeat(55);
        let label = display_label("", &snippet);
        assert_eq!(label.chars().count(), 53);
        assert!(label.ends_with("..."));
    }
}
