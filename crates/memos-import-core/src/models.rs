//! Core data models for memos-import.
//!
//! Source types describe what is read from the Memos instance, destination
//! types describe what is written to the Notes instance. The HTTP client crate
//! converts its wire types into these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity the destination assigns to a tag.
pub type TagId = i64;

/// Identity the destination assigns to a record.
pub type RecordId = i64;

// =============================================================================
// SOURCE TYPES
// =============================================================================

/// Activity state of a source user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserState {
    Active,
    Inactive,
}

impl UserState {
    /// Parse the source's state string. An empty state counts as active.
    pub fn from_api(state: &str) -> Self {
        match state {
            "" | "NORMAL" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// A user account on the source service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUser {
    /// Stable resource key, e.g. `users/1`.
    pub name: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub state: UserState,
}

impl SourceUser {
    pub fn is_active(&self) -> bool {
        self.state == UserState::Active
    }
}

/// Lifecycle state of a source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordState {
    Normal,
    Archived,
}

impl RecordState {
    /// Enumeration order used when merging the two listings.
    pub const ALL: [RecordState; 2] = [RecordState::Normal, RecordState::Archived];

    /// The value the source API expects in its `state` filter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Archived => "ARCHIVED",
        }
    }

    pub fn from_api(state: &str) -> Self {
        if state.eq_ignore_ascii_case("ARCHIVED") {
            Self::Archived
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Metadata of a file attached to a source record.
///
/// The declared size is known before the payload is fetched, which lets the
/// size policy skip oversized files without downloading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    /// Opaque locator, e.g. `attachments/uid123`.
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// One memo on the source service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Stable resource key, e.g. `memos/abc123`.
    pub name: String,
    pub state: RecordState,
    pub content: String,
    pub pinned: bool,
    /// Carried for completeness; visibility levels are not migrated.
    pub visibility: String,
    pub tags: Vec<String>,
    pub attachments: Vec<AttachmentDescriptor>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Auto-generated preview, used only as a fallback label.
    pub snippet: String,
}

impl SourceRecord {
    pub fn is_archived(&self) -> bool {
        self.state == RecordState::Archived
    }
}

/// A downloaded attachment ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

// =============================================================================
// DESTINATION TYPES
// =============================================================================

/// A tag as listed or created on the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationTag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Request for creating a record on the destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub title: String,
    pub body: String,
    pub pinned: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<TagId>,
    /// Capacity override, only sent for large bodies.
    #[serde(rename = "max_size", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// MAPPING & STATS
// =============================================================================

/// Associates one source user with a destination credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMapping {
    /// Source user key, e.g. `users/1`.
    pub source_name: String,
    pub source_username: String,
    pub source_display_name: String,
    /// Bearer token for the user's destination account.
    pub destination_token: String,
}

/// Per-user counters collected during a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStats {
    pub records_created: usize,
    pub tags_created: usize,
    pub attachments_uploaded: usize,
    /// Errors and warnings in the order they occurred.
    pub errors: Vec<String>,
}

impl MigrationStats {
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_state_from_api() {
        assert_eq!(UserState::from_api(""), UserState::Active);
        assert_eq!(UserState::from_api("NORMAL"), UserState::Active);
        assert_eq!(UserState::from_api("ARCHIVED"), UserState::Inactive);
    }

    #[test]
    fn test_record_state_round_trips_api_names() {
        for state in RecordState::ALL {
            assert_eq!(RecordState::from_api(state.as_api_str()), state);
        }
        assert_eq!(RecordState::Archived.to_string(), "ARCHIVED");
    }

    #[test]
    fn test_new_record_omits_optional_fields() {
        let req = NewRecord {
            title: String::new(),
            body: "hello".to_string(),
            pinned: false,
            tag_ids: vec![],
            capacity: None,
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("tag_ids"));
        assert!(!obj.contains_key("max_size"));
        assert!(!obj.contains_key("created_at"));
    }

    #[test]
    fn test_new_record_serializes_timestamps_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let req = NewRecord {
            title: "T".to_string(),
            body: "B".to_string(),
            pinned: true,
            tag_ids: vec![4, 7],
            capacity: Some(40_000),
            created_at: Some(ts),
            updated_at: Some(ts),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["created_at"], "2024-03-01T09:30:00Z");
        assert_eq!(json["max_size"], 40_000);
        assert_eq!(json["tag_ids"], serde_json::json!([4, 7]));
    }

    #[test]
    fn test_stats_record_error() {
        let mut stats = MigrationStats::default();
        stats.record_error("first");
        stats.record_error(String::from("second"));
        assert_eq!(stats.error_count(), 2);
        assert_eq!(stats.errors[0], "first");
    }
}
