//! Mapping HTTP failures onto the pipeline's error taxonomy.

use memos_import_core::defaults::ERROR_SNIPPET_CHARS;
use memos_import_core::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// What a call does, which decides how its failure is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    /// Liveness probe or credential exchange.
    Liveness,
    /// Listing or stats read.
    Read,
    /// Tag or record creation.
    Create,
    /// Attachment download or upload, or archiving.
    Transfer,
}

impl CallRole {
    /// Wrap `message` in the error variant for this role.
    pub fn error(self, message: impl Into<String>) -> Error {
        let message = message.into();
        match self {
            Self::Liveness => Error::Connectivity(message),
            Self::Read => Error::Fetch(message),
            Self::Create => Error::Create(message),
            Self::Transfer => Error::Transfer(message),
        }
    }
}

/// Response body truncated for inclusion in an error message.
pub fn snippet(body: &str) -> String {
    match body.char_indices().nth(ERROR_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Error for a non-2xx response to `what` (e.g. `GET /api/v1/tags`).
pub fn status_error(role: CallRole, status: StatusCode, what: &str, body: &str) -> Error {
    role.error(format!(
        "HTTP {} from {}: {}",
        status.as_u16(),
        what,
        snippet(body)
    ))
}

/// Error for a request that never produced a response.
pub fn transport_error(role: CallRole, what: &str, err: reqwest::Error) -> Error {
    role.error(format!("requesting {}: {}", what, err))
}

/// Decode a 2xx JSON body, classifying a malformed body by the call's role.
pub fn decode<T: DeserializeOwned>(role: CallRole, what: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| role.error(format!("parsing response from {}: {}", what, e)))
}
