//! # memos-import-client
//!
//! reqwest implementations of the memos-import service traits: a read-only
//! Memos client ([`MemosClient`]) and a per-user Notes client
//! ([`NotesClient`]).

pub mod config;
pub mod error;
pub mod memos;
pub mod notes;
pub mod types;

pub use config::{MemosConfig, NotesConfig};
pub use error::CallRole;
pub use memos::MemosClient;
pub use notes::NotesClient;
