//! Service traits the migration pipeline is written against.
//!
//! The pipeline never talks HTTP directly. It receives explicit service
//! handles implementing these traits, which keeps every component testable
//! against in-memory fakes.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::*;

/// Read-only view of the service records are migrated from.
#[async_trait]
pub trait SourceService: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> Result<()>;

    /// List every user, following pagination to the end.
    async fn list_users(&self) -> Result<Vec<SourceUser>>;

    /// Tag name → usage count for one user.
    async fn tag_counts(&self, user_name: &str) -> Result<HashMap<String, u64>>;

    /// List every record of one user in the given lifecycle state.
    async fn list_records(&self, user_name: &str, state: RecordState)
        -> Result<Vec<SourceRecord>>;

    /// Fetch the binary payload of one attachment.
    async fn download_attachment(&self, attachment: &AttachmentDescriptor)
        -> Result<FilePayload>;
}

/// The service records are migrated into, scoped to one user's credential.
#[async_trait]
pub trait DestinationService: Send + Sync {
    /// Liveness probe (also validates the credential).
    async fn ping(&self) -> Result<()>;

    /// Exchange an email and password for a bearer token.
    async fn authenticate(&self, email: &str, password: &str) -> Result<String>;

    /// List the user's existing tags.
    async fn list_tags(&self) -> Result<Vec<DestinationTag>>;

    /// Create a tag and return it with its assigned identity.
    async fn create_tag(&self, name: &str, color: &str) -> Result<DestinationTag>;

    /// Create a record and return its assigned identity.
    async fn create_record(&self, record: &NewRecord) -> Result<RecordId>;

    /// Archive an existing record.
    async fn archive_record(&self, id: RecordId) -> Result<()>;

    /// Upload a batch of files to a record in one call.
    async fn upload_attachments(&self, id: RecordId, files: &[FilePayload]) -> Result<()>;
}
