//! Aggregation of per-user statistics into a run summary.

use std::fmt;

use crate::models::MigrationStats;

/// Sums across every migrated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub records: usize,
    pub tags: usize,
    pub attachments: usize,
    pub errors: usize,
}

/// Statistics for every user in the order they were migrated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    users: Vec<(String, MigrationStats)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, username: &str, stats: MigrationStats) {
        self.users.push((username.to_string(), stats));
    }

    pub fn users(&self) -> &[(String, MigrationStats)] {
        &self.users
    }

    pub fn get(&self, username: &str) -> Option<&MigrationStats> {
        self.users
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, stats)| stats)
    }

    pub fn totals(&self) -> Totals {
        self.users
            .iter()
            .fold(Totals::default(), |acc, (_, s)| Totals {
                records: acc.records + s.records_created,
                tags: acc.tags + s.tags_created,
                attachments: acc.attachments + s.attachments_uploaded,
                errors: acc.errors + s.error_count(),
            })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "         Migration Summary")?;
        writeln!(f, "========================================")?;

        for (user, s) in &self.users {
            writeln!(f)?;
            writeln!(f, "  User: {}", user)?;
            writeln!(f, "    Notes created:        {}", s.records_created)?;
            writeln!(f, "    Tags created:         {}", s.tags_created)?;
            writeln!(f, "    Attachments uploaded: {}", s.attachments_uploaded)?;
            if !s.errors.is_empty() {
                writeln!(f, "    Errors:               {}", s.errors.len())?;
                for e in &s.errors {
                    writeln!(f, "      - {}", e)?;
                }
            }
        }

        let totals = self.totals();
        writeln!(f)?;
        writeln!(f, "  ──────────────────────────────────")?;
        write!(
            f,
            "  Totals: {} notes, {} tags, {} attachments",
            totals.records, totals.tags, totals.attachments
        )?;
        if totals.errors > 0 {
            write!(f, ", {} errors", totals.errors)?;
        }
        writeln!(f)?;
        writeln!(f, "========================================")
    }
}
