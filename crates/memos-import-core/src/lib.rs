//! # memos-import-core
//!
//! Migration pipeline, domain types, and service traits for memos-import.
//!
//! This crate holds everything that does not speak HTTP: the per-user
//! migration driver, tag reconciliation, record transformation, attachment
//! policy, and the operator mapping planner. Services are reached through the
//! [`SourceService`] and [`DestinationService`] traits; memos-import-client
//! provides the HTTP implementations.

pub mod attachments;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod migrate;
pub mod models;
pub mod pacer;
pub mod report;
pub mod tags;
pub mod title;
pub mod traits;
pub mod transform;

#[cfg(test)]
pub mod mock;


// Re-export commonly used types at crate root
pub use attachments::exceeds_limit;
pub use error::{Error, Result};
pub use mapping::{
    active_users, parse_selection, plan_mappings, DestinationCredential, PlannedMapping, Prompt,
    Selection,
};
pub use migrate::{fetch_all_records, migrate_all, migrate_user, MigrationOptions};
pub use models::*;
pub use pacer::Pacer;
pub use report::{RunReport, Totals};
pub use tags::{TagMap, TagSync};
pub use title::split_title;
pub use traits::*;
pub use transform::{transform_record, TransformedRecord};
