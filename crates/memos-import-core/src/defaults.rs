//! Centralized default constants for memos-import.
//!
//! **This module is the single source of truth** for the fixed thresholds the
//! pipeline applies. The client crate and the binary reference these constants
//! instead of defining their own magic numbers.

// =============================================================================
// TAGS
// =============================================================================

/// Color assigned to tags created in the destination (source tags carry none).
pub const TAG_COLOR: &str = "#6b7280";

// =============================================================================
// RECORDS
// =============================================================================

/// Bodies longer than this (in bytes) request an explicit capacity override.
pub const LARGE_BODY_THRESHOLD: usize = 32_768;

/// Extra capacity added on top of the body length when overriding.
pub const BODY_HEADROOM: usize = 1024;

/// Maximum characters of the preview used as a fallback display label.
pub const LABEL_MAX_CHARS: usize = 50;

/// Marker a first line must start with to be treated as a title.
pub const TITLE_MARKER: &str = "# ";

// =============================================================================
// ATTACHMENTS
// =============================================================================

/// Bytes per MiB, used when reporting attachment sizes.
pub const MIB: u64 = 1024 * 1024;

/// Largest attachment that is transferred (25 MiB, inclusive).
pub const MAX_ATTACHMENT_BYTES: u64 = 25 * MIB;

/// Media type assumed when the source does not report one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// HTTP
// =============================================================================

/// Page size requested from paginated source listings.
pub const PAGE_SIZE: u32 = 200;

/// Request timeout for the source service (seconds).
pub const SOURCE_TIMEOUT_SECS: u64 = 30;

/// Request timeout for the destination service (seconds).
pub const DESTINATION_TIMEOUT_SECS: u64 = 60;

/// Characters of a non-2xx response body kept in error messages.
pub const ERROR_SNIPPET_CHARS: usize = 200;

// =============================================================================
// LOG FORMATTING
// =============================================================================

/// Timestamp format used in per-record progress lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
