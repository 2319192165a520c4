//! Connection settings for the two services.

use memos_import_core::defaults::{DESTINATION_TIMEOUT_SECS, SOURCE_TIMEOUT_SECS};

/// Environment variable overriding the Memos request timeout.
pub const MEMOS_TIMEOUT_ENV: &str = "MEMOS_TIMEOUT_SECS";

/// Environment variable overriding the Notes request timeout.
pub const NOTES_TIMEOUT_ENV: &str = "NOTES_TIMEOUT_SECS";

fn timeout_from_env(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Configuration for the Memos (source) client.
#[derive(Debug, Clone)]
pub struct MemosConfig {
    /// Base URL, e.g. `http://localhost:8081`.
    pub base_url: String,
    /// Personal access token.
    pub token: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl MemosConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_seconds: SOURCE_TIMEOUT_SECS,
        }
    }

    /// Like [`MemosConfig::new`], with the timeout read from `MEMOS_TIMEOUT_SECS`.
    pub fn from_env(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            timeout_seconds: timeout_from_env(MEMOS_TIMEOUT_ENV, SOURCE_TIMEOUT_SECS),
            ..Self::new(base_url, token)
        }
    }
}

/// Configuration for the Notes (destination) client.
#[derive(Debug, Clone)]
pub struct NotesConfig {
    /// Base URL, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Bearer token; absent only while signing in.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl NotesConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_seconds: DESTINATION_TIMEOUT_SECS,
        }
    }

    /// Like [`NotesConfig::new`], with the timeout read from `NOTES_TIMEOUT_SECS`.
    pub fn from_env(base_url: impl Into<String>) -> Self {
        Self {
            timeout_seconds: timeout_from_env(NOTES_TIMEOUT_ENV, DESTINATION_TIMEOUT_SECS),
            ..Self::new(base_url)
        }
    }

    /// Same settings, authenticated as `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }
}
