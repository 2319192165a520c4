//! Command-line arguments.

use clap::Parser;
use memos_import_core::defaults::TAG_COLOR;
use memos_import_core::{MigrationOptions, Pacer};

/// Import every memo from a Memos instance into a Notes instance.
///
/// Memo relations, reactions, comments, and shares are not migrated. Memos
/// visibility has no equivalent; imported notes are private to the mapped
/// Notes user. Attachments larger than 25 MB are skipped with a warning.
#[derive(Debug, Parser)]
#[command(name = "import-memos")]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the Memos instance (e.g. http://localhost:8081)
    #[arg(long, env = "MEMOS_URL")]
    pub memos_url: Option<String>,

    /// Personal access token for the Memos instance
    #[arg(long, env = "MEMOS_TOKEN", hide_env_values = true)]
    pub memos_token: Option<String>,

    /// Base URL of the Notes instance (e.g. http://localhost:3000)
    #[arg(long, env = "NOTES_URL")]
    pub notes_url: Option<String>,

    /// Delay in milliseconds before each Notes write (to avoid rate limiting)
    #[arg(long, env = "IMPORT_DELAY_MS", default_value_t = 0)]
    pub delay: u64,

    /// Print what would be done without writing to Notes
    #[arg(long, env = "IMPORT_DRY_RUN")]
    pub dry_run: bool,

    /// Color given to tags created in Notes
    #[arg(long, default_value = TAG_COLOR)]
    pub tag_color: String,
}

/// The three connection settings every run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub memos_url: String,
    pub memos_token: String,
    pub notes_url: String,
}

impl Args {
    /// Connection settings, or `None` if any is missing or blank.
    pub fn endpoints(&self) -> Option<Endpoints> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Some(Endpoints {
            memos_url: present(&self.memos_url)?,
            memos_token: present(&self.memos_token)?,
            notes_url: present(&self.notes_url)?,
        })
    }

    pub fn migration_options(&self) -> MigrationOptions {
        MigrationOptions {
            dry_run: self.dry_run,
            pacer: Pacer::from_millis(self.delay),
            tag_color: self.tag_color.clone(),
            ..MigrationOptions::default()
        }
    }
}
