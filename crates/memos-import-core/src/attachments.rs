//! Attachment filtering, download, and bundled upload.
//!
//! Every failure in here is soft: the destination record already exists and
//! stands regardless of what happens to its attachments. Failures are logged
//! and appended to the user's stats.

use tracing::{info, instrument, warn};

use crate::defaults::MIB;
use crate::logging::{COMPONENT_ATTACHMENTS, SUBSYSTEM_PIPELINE};
use crate::models::{AttachmentDescriptor, FilePayload, MigrationStats, RecordId, SourceRecord};
use crate::pacer::Pacer;
use crate::traits::{DestinationService, SourceService};

/// Whether `attachment` is over the size limit.
pub fn exceeds_limit(attachment: &AttachmentDescriptor, max_bytes: u64) -> bool {
    attachment.size > max_bytes
}

/// Warning recorded for an attachment over the size limit.
pub fn oversize_warning(attachment: &AttachmentDescriptor, max_bytes: u64) -> String {
    format!(
        "skipping attachment {:?} ({} MB): exceeds {} MB limit",
        attachment.filename,
        attachment.size / MIB,
        max_bytes / MIB
    )
}

/// Record the size-limit warning for `attachment` if it is oversized.
///
/// Returns true when the attachment must be skipped.
fn skip_oversized(
    attachment: &AttachmentDescriptor,
    max_bytes: u64,
    progress: &str,
    stats: &mut MigrationStats,
) -> bool {
    if !exceeds_limit(attachment, max_bytes) {
        return false;
    }
    let msg = oversize_warning(attachment, max_bytes);
    warn!("{} Warning: {}", progress, msg);
    stats.record_error(msg);
    true
}

/// Download every eligible attachment of `record` and upload them to
/// `record_id` in one bundled call.
///
/// Attachments are handled in listing order, so size-limit and download
/// warnings land in `stats.errors` in the order they occur. Returns the
/// number of files uploaded, which is also added to
/// `stats.attachments_uploaded`.
#[allow(clippy::too_many_arguments)]
#[instrument(
    skip_all,
    fields(
        subsystem = SUBSYSTEM_PIPELINE,
        component = COMPONENT_ATTACHMENTS,
        record_id = record_id,
        memo = %record.name
    )
)]
pub async fn transfer_attachments<S, D>(
    source: &S,
    dest: &D,
    record_id: RecordId,
    record: &SourceRecord,
    max_bytes: u64,
    pacer: &Pacer,
    progress: &str,
    stats: &mut MigrationStats,
) -> usize
where
    S: SourceService + ?Sized,
    D: DestinationService + ?Sized,
{
    info!(
        "{} Downloading {} attachment(s)...",
        progress,
        record.attachments.len()
    );

    let mut files: Vec<FilePayload> = Vec::with_capacity(record.attachments.len());
    for attachment in &record.attachments {
        if skip_oversized(attachment, max_bytes, progress, stats) {
            continue;
        }
        match source.download_attachment(attachment).await {
            Ok(file) => files.push(file),
            Err(e) => {
                let msg = format!(
                    "downloading attachment {:?} from memo {}: {}",
                    attachment.filename,
                    record.name,
                    e.message()
                );
                warn!("{} Warning: {}", progress, msg);
                stats.record_error(msg);
            }
        }
    }

    if files.is_empty() {
        return 0;
    }

    info!("{} Uploading {} file(s)...", progress, files.len());
    pacer.pause().await;
    match dest.upload_attachments(record_id, &files).await {
        Ok(()) => {
            stats.attachments_uploaded += files.len();
            files.len()
        }
        Err(e) => {
            let msg = format!(
                "uploading attachments to note {}: {}",
                record_id,
                e.message()
            );
            warn!("{} Warning: {}", progress, msg);
            stats.record_error(msg);
            0
        }
    }
}

/// Dry-run variant: applies the size policy and counts what would be
/// uploaded without downloading anything.
pub fn simulate_attachments(
    record: &SourceRecord,
    max_bytes: u64,
    progress: &str,
    stats: &mut MigrationStats,
) -> usize {
    let mut names: Vec<&str> = Vec::with_capacity(record.attachments.len());
    for attachment in &record.attachments {
        if !skip_oversized(attachment, max_bytes, progress, stats) {
            names.push(attachment.filename.as_str());
        }
    }

    if !names.is_empty() {
        info!(
            "{} [dry-run] Would upload {} file(s): {}",
            progress,
            names.len(),
            names.join(", ")
        );
    }
    stats.attachments_uploaded += names.len();
    names.len()
}
