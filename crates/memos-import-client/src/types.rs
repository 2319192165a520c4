//! Wire types for the Memos and Notes REST APIs.
//!
//! These mirror the JSON the services exchange and convert into the core
//! models. Memos uses camelCase keys; Notes uses snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use memos_import_core::defaults::FALLBACK_CONTENT_TYPE;
use memos_import_core::{
    AttachmentDescriptor, DestinationTag, RecordState, SourceRecord, SourceUser, TagId, UserState,
};

// =============================================================================
// MEMOS
// =============================================================================

/// A page of a paginated Memos listing.
pub trait Paged {
    type Item;

    /// Items on this page and the token for the next one (empty when done).
    fn into_parts(self) -> (Vec<Self::Item>, String);
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemosUser {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub state: String,
}

impl From<MemosUser> for SourceUser {
    fn from(u: MemosUser) -> Self {
        Self {
            state: UserState::from_api(&u.state),
            name: u.name,
            username: u.username,
            display_name: u.display_name,
            email: Some(u.email).filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<MemosUser>,
    #[serde(default)]
    pub next_page_token: String,
}

impl Paged for ListUsersResponse {
    type Item = MemosUser;

    fn into_parts(self) -> (Vec<MemosUser>, String) {
        (self.users, self.next_page_token)
    }
}

/// Accepts a JSON number or a numeric string (int64 fields may arrive as
/// either).
fn flexible_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemosAttachment {
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, rename = "type")]
    pub content_type: String,
    #[serde(default, deserialize_with = "flexible_u64")]
    pub size: u64,
    #[serde(default)]
    pub external_link: String,
}

impl From<MemosAttachment> for AttachmentDescriptor {
    fn from(a: MemosAttachment) -> Self {
        Self {
            name: a.name,
            filename: a.filename,
            content_type: if a.content_type.is_empty() {
                FALLBACK_CONTENT_TYPE.to_string()
            } else {
                a.content_type
            },
            size: a.size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemosMemo {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub attachments: Vec<MemosAttachment>,
    #[serde(default)]
    pub snippet: String,
}

impl From<MemosMemo> for SourceRecord {
    fn from(m: MemosMemo) -> Self {
        Self {
            state: RecordState::from_api(&m.state),
            name: m.name,
            content: m.content,
            pinned: m.pinned,
            visibility: m.visibility,
            tags: m.tags,
            attachments: m.attachments.into_iter().map(Into::into).collect(),
            created_at: m.create_time,
            updated_at: m.update_time,
            snippet: m.snippet,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMemosResponse {
    #[serde(default)]
    pub memos: Vec<MemosMemo>,
    #[serde(default)]
    pub next_page_token: String,
}

impl Paged for ListMemosResponse {
    type Item = MemosMemo;

    fn into_parts(self) -> (Vec<MemosMemo>, String) {
        (self.memos, self.next_page_token)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag_count: HashMap<String, u64>,
}

// =============================================================================
// NOTES
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NotesTag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<NotesTag> for DestinationTag {
    fn from(t: NotesTag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            color: t.color.unwrap_or_default(),
        }
    }
}

/// `GET /api/v1/tags` answers with either a wrapper object or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagListResponse {
    Wrapped { tags: Vec<NotesTag> },
    Bare(Vec<NotesTag>),
}

impl TagListResponse {
    pub fn into_tags(self) -> Vec<NotesTag> {
        match self {
            Self::Wrapped { tags } | Self::Bare(tags) => tags,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTagRequest<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

/// Only the identity of a created note is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedNote {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}
