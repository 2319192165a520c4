//! Structured logging vocabulary for memos-import.
//!
//! Spans and events use these values for the `subsystem` and `component`
//! fields so a run's log can be filtered by pipeline stage.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Hard failure, the current user's migration stops |
//! | WARN  | Soft failure, recorded in the user's stats and skipped |
//! | INFO  | Phase progress, per-record outcome, dry-run descriptions |
//! | DEBUG | Decision points (capacity override, dropped tag names) |
//! | TRACE | Per-page listing progress |

// ─── Subsystems ────────────────────────────────────────────────────────────

/// Pipeline code in memos-import-core.
pub const SUBSYSTEM_PIPELINE: &str = "pipeline";

/// HTTP clients in memos-import-client.
pub const SUBSYSTEM_CLIENT: &str = "client";

// ─── Components ────────────────────────────────────────────────────────────

/// Per-user migration driver.
pub const COMPONENT_DRIVER: &str = "driver";

/// Tag reconciliation.
pub const COMPONENT_TAGS: &str = "tag_sync";

/// Attachment filtering and transfer.
pub const COMPONENT_ATTACHMENTS: &str = "attachments";

/// Source (Memos) HTTP client.
pub const COMPONENT_SOURCE: &str = "memos";

/// Destination (Notes) HTTP client.
pub const COMPONENT_DESTINATION: &str = "notes";
