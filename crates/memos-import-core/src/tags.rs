//! Tag reconciliation between the source vocabulary and the destination.
//!
//! ## Matching
//!
//! Names are compared case-insensitively: map keys are lower-cased, but a tag
//! created on the destination keeps the source's original casing. Existing
//! destination tags are never modified.
//!
//! ## Ordering
//!
//! Source tag names are sorted before iteration so that creation order and
//! dry-run placeholder identities are deterministic.

use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::logging::{COMPONENT_TAGS, SUBSYSTEM_PIPELINE};
use crate::models::{DestinationTag, TagId};
use crate::pacer::Pacer;
use crate::traits::{DestinationService, SourceService};

/// Case-insensitive tag name → destination identity map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    ids: HashMap<String, TagId>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a map from the destination's current inventory.
    pub fn from_tags(tags: &[DestinationTag]) -> Self {
        let mut map = Self::new();
        for tag in tags {
            map.insert(&tag.name, tag.id);
        }
        map
    }

    pub fn insert(&mut self, name: &str, id: TagId) {
        self.ids.insert(name.to_lowercase(), id);
    }

    pub fn get(&self, name: &str) -> Option<TagId> {
        self.ids.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of reconciling one user's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSync {
    pub tags: TagMap,
    /// Tags created on the destination (in a dry run: every source tag).
    pub created: usize,
}

impl TagSync {
    /// Entries that were already present on the destination.
    pub fn existing(&self) -> usize {
        self.tags.len().saturating_sub(self.created)
    }
}

/// Source tag names in sorted order.
pub fn sorted_names(usage: &HashMap<String, u64>) -> Vec<&str> {
    let mut names: Vec<&str> = usage.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Create every source tag missing from the destination inventory.
///
/// Aborts on the first failed creation; tags are a prerequisite for the
/// records that reference them.
pub async fn reconcile_tags<D>(
    dest: &D,
    usage: &HashMap<String, u64>,
    color: &str,
    pacer: &Pacer,
) -> Result<TagSync>
where
    D: DestinationService + ?Sized,
{
    let existing = dest
        .list_tags()
        .await
        .map_err(|e| e.context("listing Notes tags"))?;
    let mut tags = TagMap::from_tags(&existing);
    let mut created = 0;

    for name in sorted_names(usage) {
        if tags.contains(name) {
            debug!(tag = name, "Tag already exists");
            continue;
        }

        pacer.pause().await;
        let tag = dest
            .create_tag(name, color)
            .await
            .map_err(|e| e.context(format!("creating tag {:?}", name)))?;
        debug!(tag = %tag.name, tag_id = tag.id, "Created tag");
        tags.insert(&tag.name, tag.id);
        created += 1;
    }

    Ok(TagSync { tags, created })
}

/// Dry-run variant: no destination reads or writes.
///
/// Every source tag gets a placeholder identity and counts as created, since
/// existing and new tags cannot be told apart without reading the
/// destination.
pub fn simulate_tags(usage: &HashMap<String, u64>) -> TagSync {
    let names = sorted_names(usage);
    let mut tags = TagMap::new();
    for (i, name) in names.iter().enumerate() {
        info!(tag = *name, "[dry-run] Would create tag {:?} (if not exists)", name);
        tags.insert(name, i as TagId + 1);
    }
    TagSync {
        tags,
        created: names.len(),
    }
}

/// Fetch the user's tag usage from the source and reconcile it.
#[instrument(
    skip(source, dest, pacer),
    fields(subsystem = SUBSYSTEM_PIPELINE, component = COMPONENT_TAGS, op = "sync_tags")
)]
pub async fn sync_tags<S, D>(
    source: &S,
    dest: &D,
    user_name: &str,
    color: &str,
    pacer: &Pacer,
    dry_run: bool,
) -> Result<TagSync>
where
    S: SourceService + ?Sized,
    D: DestinationService + ?Sized,
{
    let usage = source.tag_counts(user_name).await?;
    debug!(tag_count = usage.len(), "Fetched source tag usage");

    if dry_run {
        return Ok(simulate_tags(&usage));
    }
    reconcile_tags(dest, &usage, color, pacer).await
}
