//! In-memory source and destination services for deterministic testing.
//!
//! Both fakes log every call so tests can assert on what the pipeline did,
//! e.g. that a dry run issued no destination writes or that an oversized
//! attachment was never downloaded.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{DestinationService, SourceService};

/// Operations that mutate the destination.
pub const MUTATING_OPERATIONS: [&str; 4] = [
    "create_tag",
    "create_record",
    "archive_record",
    "upload_attachments",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

#[derive(Debug, Clone, Default)]
struct CallLog(Arc<Mutex<Vec<MockCall>>>);

impl CallLog {
    fn log(&self, operation: &str, input: impl Into<String>) {
        self.0.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.into(),
        });
    }

    fn calls(&self) -> Vec<MockCall> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, operation: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }
}

/// Build a normal-state record with the given key and content.
pub fn record(name: &str, content: &str) -> SourceRecord {
    SourceRecord {
        name: name.to_string(),
        state: RecordState::Normal,
        content: content.to_string(),
        pinned: false,
        visibility: "PRIVATE".to_string(),
        tags: vec![],
        attachments: vec![],
        created_at: None,
        updated_at: None,
        snippet: content.chars().take(64).collect(),
    }
}

/// Build an attachment descriptor with locator `attachments/<filename>`.
pub fn attachment(filename: &str, size: u64) -> AttachmentDescriptor {
    AttachmentDescriptor {
        name: format!("attachments/{}", filename),
        filename: filename.to_string(),
        content_type: "application/octet-stream".to_string(),
        size,
    }
}

pub fn user(id: u32, username: &str) -> SourceUser {
    SourceUser {
        name: format!("users/{}", id),
        username: username.to_string(),
        display_name: username.to_uppercase(),
        email: None,
        state: UserState::Active,
    }
}

pub fn mapping(user: &SourceUser, token: &str) -> UserMapping {
    UserMapping {
        source_name: user.name.clone(),
        source_username: user.username.clone(),
        source_display_name: user.display_name.clone(),
        destination_token: token.to_string(),
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Fake source service backed by fixture data.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    users: Vec<SourceUser>,
    tag_counts: HashMap<String, HashMap<String, u64>>,
    records: Vec<(String, SourceRecord)>,
    payloads: HashMap<String, Vec<u8>>,
    fail_tag_counts: bool,
    fail_listing: Option<RecordState>,
    calls: CallLog,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: SourceUser) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_tag(mut self, user_name: &str, tag: &str, count: u64) -> Self {
        self.tag_counts
            .entry(user_name.to_string())
            .or_default()
            .insert(tag.to_string(), count);
        self
    }

    pub fn with_record(mut self, user_name: &str, record: SourceRecord) -> Self {
        self.records.push((user_name.to_string(), record));
        self
    }

    /// Register a downloadable payload for an attachment locator.
    pub fn with_payload(mut self, locator: &str, data: &[u8]) -> Self {
        self.payloads.insert(locator.to_string(), data.to_vec());
        self
    }

    pub fn failing_tag_counts(mut self) -> Self {
        self.fail_tag_counts = true;
        self
    }

    pub fn failing_listing(mut self, state: RecordState) -> Self {
        self.fail_listing = Some(state);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.calls()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.count(operation)
    }

    /// Locators passed to `download_attachment`, in call order.
    pub fn downloaded(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == "download_attachment")
            .map(|c| c.input)
            .collect()
    }
}

#[async_trait]
impl SourceService for MockSource {
    async fn ping(&self) -> Result<()> {
        self.calls.log("ping", "");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<SourceUser>> {
        self.calls.log("list_users", "");
        Ok(self.users.clone())
    }

    async fn tag_counts(&self, user_name: &str) -> Result<HashMap<String, u64>> {
        self.calls.log("tag_counts", user_name);
        if self.fail_tag_counts {
            return Err(Error::Fetch(format!("getting stats for {}", user_name)));
        }
        Ok(self.tag_counts.get(user_name).cloned().unwrap_or_default())
    }

    async fn list_records(
        &self,
        user_name: &str,
        state: RecordState,
    ) -> Result<Vec<SourceRecord>> {
        self.calls
            .log("list_records", format!("{}:{}", user_name, state));
        if self.fail_listing == Some(state) {
            return Err(Error::Fetch(format!("listing memos (state={})", state)));
        }
        Ok(self
            .records
            .iter()
            .filter(|(owner, r)| owner == user_name && r.state == state)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn download_attachment(&self, attachment: &AttachmentDescriptor) -> Result<FilePayload> {
        self.calls.log("download_attachment", attachment.name.clone());
        match self.payloads.get(&attachment.name) {
            Some(data) => Ok(FilePayload {
                filename: attachment.filename.clone(),
                content_type: attachment.content_type.clone(),
                data: data.clone(),
            }),
            None => Err(Error::Transfer(format!(
                "HTTP 404 downloading attachment {}",
                attachment.name
            ))),
        }
    }
}

// =============================================================================
// DESTINATION
// =============================================================================

#[derive(Debug, Default)]
struct DestinationState {
    tags: Vec<DestinationTag>,
    records: Vec<(RecordId, NewRecord)>,
    archived: Vec<RecordId>,
    uploads: Vec<(RecordId, Vec<String>)>,
    next_id: i64,
}

impl DestinationState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Fake destination service that stores everything it is sent.
#[derive(Debug, Clone, Default)]
pub struct MockDestination {
    state: Arc<Mutex<DestinationState>>,
    fail_list_tags: bool,
    fail_tag_names: HashSet<String>,
    fail_record_bodies: HashSet<String>,
    fail_archive: bool,
    fail_upload: bool,
    calls: CallLog,
}

impl MockDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing tag. Identities of seeded tags start at 100.
    pub fn with_tag(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = 100 + state.tags.len() as i64;
            state.tags.push(DestinationTag {
                id,
                name: name.to_string(),
                color: "#000000".to_string(),
            });
        }
        self
    }

    pub fn failing_list_tags(mut self) -> Self {
        self.fail_list_tags = true;
        self
    }

    pub fn failing_tag(mut self, name: &str) -> Self {
        self.fail_tag_names.insert(name.to_string());
        self
    }

    /// Fail `create_record` for records whose body equals `body`.
    pub fn failing_record(mut self, body: &str) -> Self {
        self.fail_record_bodies.insert(body.to_string());
        self
    }

    pub fn failing_archive(mut self) -> Self {
        self.fail_archive = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn tags(&self) -> Vec<DestinationTag> {
        self.state.lock().unwrap().tags.clone()
    }

    pub fn records(&self) -> Vec<(RecordId, NewRecord)> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn archived(&self) -> Vec<RecordId> {
        self.state.lock().unwrap().archived.clone()
    }

    /// Filenames uploaded per record, one entry per upload call.
    pub fn uploads(&self) -> Vec<(RecordId, Vec<String>)> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.calls()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.count(operation)
    }

    pub fn mutation_count(&self) -> usize {
        MUTATING_OPERATIONS
            .iter()
            .map(|op| self.calls.count(op))
            .sum()
    }
}

#[async_trait]
impl DestinationService for MockDestination {
    async fn ping(&self) -> Result<()> {
        self.calls.log("ping", "");
        Ok(())
    }

    async fn authenticate(&self, email: &str, _password: &str) -> Result<String> {
        self.calls.log("authenticate", email);
        Ok(format!("token-for-{}", email))
    }

    async fn list_tags(&self) -> Result<Vec<DestinationTag>> {
        self.calls.log("list_tags", "");
        if self.fail_list_tags {
            return Err(Error::Fetch("listing tags: HTTP 500".to_string()));
        }
        Ok(self.tags())
    }

    async fn create_tag(&self, name: &str, color: &str) -> Result<DestinationTag> {
        self.calls.log("create_tag", name);
        if self.fail_tag_names.contains(name) {
            return Err(Error::Create("HTTP 422 from POST /api/v1/tags".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let tag = DestinationTag {
            id: state.next_id(),
            name: name.to_string(),
            color: color.to_string(),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn create_record(&self, record: &NewRecord) -> Result<RecordId> {
        self.calls.log("create_record", record.title.clone());
        if self.fail_record_bodies.contains(&record.body) {
            return Err(Error::Create("HTTP 500 from POST /api/v1/notes".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.records.push((id, record.clone()));
        Ok(id)
    }

    async fn archive_record(&self, id: RecordId) -> Result<()> {
        self.calls.log("archive_record", id.to_string());
        if self.fail_archive {
            return Err(Error::Transfer(format!("archiving note {}", id)));
        }
        self.state.lock().unwrap().archived.push(id);
        Ok(())
    }

    async fn upload_attachments(&self, id: RecordId, files: &[FilePayload]) -> Result<()> {
        self.calls.log("upload_attachments", id.to_string());
        if self.fail_upload {
            return Err(Error::Transfer(format!("HTTP 413 uploading attachments to note {}", id)));
        }
        let names = files.iter().map(|f| f.filename.clone()).collect();
        self.state.lock().unwrap().uploads.push((id, names));
        Ok(())
    }
}
