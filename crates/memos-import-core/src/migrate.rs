//! Per-user migration driver.
//!
//! Phases run strictly in order: tag sync, record enumeration, then one pass
//! over the records. A failure in either of the first two phases ends the
//! user's migration; a failure while handling one record is recorded and the
//! next record is attempted. Nothing is retried.

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::attachments::{simulate_attachments, transfer_attachments};
use crate::defaults::{MAX_ATTACHMENT_BYTES, TAG_COLOR, TIMESTAMP_FORMAT};
use crate::error::Result;
use crate::logging::{COMPONENT_DRIVER, SUBSYSTEM_PIPELINE};
use crate::models::{MigrationStats, RecordState, SourceRecord, UserMapping};
use crate::pacer::Pacer;
use crate::report::RunReport;
use crate::tags::{sync_tags, TagMap};
use crate::traits::{DestinationService, SourceService};
use crate::transform::{transform_record, TransformedRecord};

/// Run-wide settings shared by every user's migration.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Simulate every destination write instead of performing it.
    pub dry_run: bool,
    /// Pause before each destination write.
    pub pacer: Pacer,
    /// Color given to tags created on the destination.
    pub tag_color: String,
    /// Attachments larger than this are skipped.
    pub max_attachment_bytes: u64,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            pacer: Pacer::default(),
            tag_color: TAG_COLOR.to_string(),
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Fetch a user's normal and archived records, oldest first.
///
/// The sort is stable, so records with equal timestamps keep listing order
/// (normal before archived).
pub async fn fetch_all_records<S>(source: &S, user_name: &str) -> Result<Vec<SourceRecord>>
where
    S: SourceService + ?Sized,
{
    let mut all = Vec::new();
    let mut counts = Vec::with_capacity(RecordState::ALL.len());
    for state in RecordState::ALL {
        let records = source.list_records(user_name, state).await?;
        counts.push(records.len());
        all.extend(records);
    }

    info!(
        "    Total: {} memos ({} normal, {} archived). Sorting by date...",
        all.len(),
        counts[0],
        counts[1]
    );
    all.sort_by_key(|r| r.created_at);
    Ok(all)
}

/// Migrate everything one source user owns into their destination account.
///
/// Never fails: hard failures end the user's migration early and are
/// recorded in the returned stats alongside any soft failures.
#[instrument(
    skip_all,
    fields(
        subsystem = SUBSYSTEM_PIPELINE,
        component = COMPONENT_DRIVER,
        user = %mapping.source_username,
        dry_run = opts.dry_run
    )
)]
pub async fn migrate_user<S, D>(
    source: &S,
    dest: &D,
    mapping: &UserMapping,
    opts: &MigrationOptions,
) -> MigrationStats
where
    S: SourceService + ?Sized,
    D: DestinationService + ?Sized,
{
    let mut stats = MigrationStats::default();
    let label = format!("[{}]", mapping.source_username);

    info!("{} Step 1/3: Syncing tags...", label);
    let tag_sync = match sync_tags(
        source,
        dest,
        &mapping.source_name,
        &opts.tag_color,
        &opts.pacer,
        opts.dry_run,
    )
    .await
    {
        Ok(sync) => sync,
        Err(e) => {
            let msg = format!("tag sync failed: {}", e);
            error!("{} Error: {}", label, msg);
            stats.record_error(msg);
            return stats;
        }
    };
    stats.tags_created = tag_sync.created;
    info!(
        "{}   Tags ready: {} existing, {} newly created",
        label,
        tag_sync.existing(),
        tag_sync.created
    );

    info!("{} Step 2/3: Fetching all memos...", label);
    let records = match fetch_all_records(source, &mapping.source_name).await {
        Ok(records) => records,
        Err(e) => {
            let msg = format!("fetching memos failed: {}", e);
            error!("{} Error: {}", label, msg);
            stats.record_error(msg);
            return stats;
        }
    };

    info!(
        "{} Step 3/3: Importing {} memo(s) into Notes...",
        label,
        records.len()
    );
    let total = records.len();
    for (i, record) in records.iter().enumerate() {
        let progress = format!("{} [{}/{}]", label, i + 1, total);
        if opts.dry_run {
            simulate_record(record, &tag_sync.tags, &progress, opts, &mut stats);
        } else {
            migrate_record(source, dest, record, &tag_sync.tags, &progress, opts, &mut stats)
                .await;
        }
    }

    stats
}

/// Create one record and its archive state and attachments.
async fn migrate_record<S, D>(
    source: &S,
    dest: &D,
    record: &SourceRecord,
    tags: &TagMap,
    progress: &str,
    opts: &MigrationOptions,
    stats: &mut MigrationStats,
) where
    S: SourceService + ?Sized,
    D: DestinationService + ?Sized,
{
    let TransformedRecord { request, label } = transform_record(record, tags);
    info!("  {} Creating note {:?}...", progress, label);

    opts.pacer.pause().await;
    let id = match dest.create_record(&request).await {
        Ok(id) => id,
        Err(e) => {
            let msg = format!("creating note from memo {}: {}", record.name, e.message());
            warn!("  {} Error: {}", progress, msg);
            stats.record_error(msg);
            return;
        }
    };
    stats.records_created += 1;

    if record.is_archived() {
        info!("  {} Archiving note #{}...", progress, id);
        opts.pacer.pause().await;
        if let Err(e) = dest.archive_record(id).await {
            let msg = format!("archiving note {}: {}", id, e.message());
            warn!("  {} Warning: {}", progress, msg);
            stats.record_error(msg);
        }
    }

    if !record.attachments.is_empty() {
        transfer_attachments(
            source,
            dest,
            id,
            record,
            opts.max_attachment_bytes,
            &opts.pacer,
            progress,
            stats,
        )
        .await;
    }

    info!(
        "           -> note #{} | {} tags, {} attachments | created {}, updated {}",
        id,
        request.tag_ids.len(),
        record.attachments.len(),
        format_timestamp(record.created_at),
        format_timestamp(record.updated_at)
    );
}

/// Describe what `migrate_record` would do, updating the same counters.
fn simulate_record(
    record: &SourceRecord,
    tags: &TagMap,
    progress: &str,
    opts: &MigrationOptions,
    stats: &mut MigrationStats,
) {
    let TransformedRecord { request, label } = transform_record(record, tags);
    info!(
        "  {} [dry-run] Would create note {:?} ({} tags, {} attachments, pinned={}, archived={})",
        progress,
        label,
        request.tag_ids.len(),
        record.attachments.len(),
        request.pinned,
        record.is_archived()
    );
    info!(
        "           Created: {}  Updated: {}",
        format_timestamp(record.created_at),
        format_timestamp(record.updated_at)
    );
    stats.records_created += 1;

    if record.is_archived() {
        info!("  {} [dry-run] Would archive note", progress);
    }
    if !record.attachments.is_empty() {
        simulate_attachments(record, opts.max_attachment_bytes, progress, stats);
    }
}

/// Migrate every mapped user in order, one at a time.
///
/// `connect` builds the destination handle for a mapping; if it fails the
/// user is recorded with that error and skipped.
pub async fn migrate_all<S, D, F>(
    source: &S,
    mappings: &[UserMapping],
    opts: &MigrationOptions,
    mut connect: F,
) -> RunReport
where
    S: SourceService + ?Sized,
    D: DestinationService,
    F: FnMut(&UserMapping) -> Result<D>,
{
    let mut report = RunReport::new();
    for mapping in mappings {
        let stats = match connect(mapping) {
            Ok(dest) => migrate_user(source, &dest, mapping, opts).await,
            Err(e) => {
                let msg = format!("connecting to Notes failed: {}", e);
                error!("[{}] Error: {}", mapping.source_username, msg);
                let mut stats = MigrationStats::default();
                stats.record_error(msg);
                stats
            }
        };
        report.push(&mapping.source_username, stats);
    }
    report
}
