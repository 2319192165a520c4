//! Error types for memos-import.

use thiserror::Error;

/// Result type alias using memos-import's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for migration operations.
///
/// The first four variants mirror how a failure is treated by the per-user
/// driver: connectivity and fetch failures abort the affected user, create
/// failures abort the user only during the tag phase, and transfer failures
/// are always recorded as warnings.
#[derive(Error, Debug)]
pub enum Error {
    /// Liveness probe failed for the source or destination service
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// A read call (listing, stats, enumeration) failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Tag or record creation failed
    #[error("Create error: {0}")]
    Create(String),

    /// Attachment download, upload, or archive call failed
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Prefix the message with `context`, keeping the variant.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Error::Connectivity(m) => Error::Connectivity(format!("{}: {}", context, m)),
            Error::Fetch(m) => Error::Fetch(format!("{}: {}", context, m)),
            Error::Create(m) => Error::Create(format!("{}: {}", context, m)),
            Error::Transfer(m) => Error::Transfer(format!("{}: {}", context, m)),
            Error::Serialization(m) => Error::Serialization(format!("{}: {}", context, m)),
            Error::Config(m) => Error::Config(format!("{}: {}", context, m)),
            Error::InvalidInput(m) => Error::InvalidInput(format!("{}: {}", context, m)),
        }
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Connectivity(m)
            | Error::Fetch(m)
            | Error::Create(m)
            | Error::Transfer(m)
            | Error::Serialization(m)
            | Error::Config(m)
            | Error::InvalidInput(m) => m.clone(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
