//! Planning which source users to migrate and with which credentials.
//!
//! The planner is driven by an `ask` callback that receives a [`Prompt`] and
//! returns the operator's answer, or `None` when input is exhausted. The
//! binary wires this to stdin; tests feed scripted answers.

use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{SourceUser, UserMapping};

/// Answer to the credential prompt that switches to email/password sign-in.
pub const LOGIN_KEYWORD: &str = "login";

/// A question the planner needs the operator to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// Pick users from the numbered list (comma-separated, or `all`).
    Selection { users: &'a [&'a SourceUser] },
    /// Destination token for a user; blank skips, `login` signs in instead.
    Credential { user: &'a SourceUser },
    Email { user: &'a SourceUser },
    Password { user: &'a SourceUser },
}

/// How a user's destination account will be accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationCredential {
    Token(String),
    Login { email: String, password: String },
}

/// A selected user whose credential still has to be verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMapping {
    pub user: SourceUser,
    pub credential: DestinationCredential,
}

impl PlannedMapping {
    /// Finish the mapping once a bearer token is known.
    pub fn into_mapping(self, token: String) -> UserMapping {
        UserMapping {
            source_name: self.user.name,
            source_username: self.user.username,
            source_display_name: self.user.display_name,
            destination_token: token,
        }
    }
}

/// Parsed user selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Zero-based indices into the active-user list, in input order.
    pub indices: Vec<usize>,
    /// Entries that were not a number in range.
    pub invalid: Vec<String>,
}

/// Users whose state allows migration.
pub fn active_users(users: &[SourceUser]) -> Vec<&SourceUser> {
    users.iter().filter(|u| u.is_active()).collect()
}

/// Parse `all` or a comma-separated list of 1-based positions.
pub fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Selection {
            indices: (0..count).collect(),
            invalid: vec![],
        };
    }

    let mut selection = Selection::default();
    for part in input.split(',').map(str::trim) {
        match part.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => selection.indices.push(n - 1),
            _ => selection.invalid.push(part.to_string()),
        }
    }
    selection
}

fn answer<F>(ask: &mut F, prompt: Prompt<'_>) -> Result<String>
where
    F: FnMut(Prompt<'_>) -> Option<String>,
{
    ask(prompt)
        .map(|a| a.trim().to_string())
        .ok_or_else(|| Error::InvalidInput("no input received".to_string()))
}

/// Ask the operator which users to migrate and how to reach each one's
/// destination account.
pub fn plan_mappings<F>(users: &[SourceUser], mut ask: F) -> Result<Vec<PlannedMapping>>
where
    F: FnMut(Prompt<'_>) -> Option<String>,
{
    let active = active_users(users);
    if active.is_empty() {
        return Err(Error::InvalidInput(
            "no active users found in Memos".to_string(),
        ));
    }

    let input = answer(&mut ask, Prompt::Selection { users: &active })?;
    let selection = parse_selection(&input, active.len());
    for entry in &selection.invalid {
        warn!("  Warning: skipping invalid selection {:?}", entry);
    }
    if selection.indices.is_empty() {
        return Err(Error::InvalidInput(
            "no users selected for migration".to_string(),
        ));
    }

    let mut planned = Vec::new();
    for user in selection.indices.into_iter().map(|i| active[i]) {
        let credential = answer(&mut ask, Prompt::Credential { user })?;
        if credential.is_empty() {
            warn!("  Skipping {} (no token provided)", user.username);
            continue;
        }

        let credential = if credential.eq_ignore_ascii_case(LOGIN_KEYWORD) {
            let email = answer(&mut ask, Prompt::Email { user })?;
            if email.is_empty() {
                warn!("  Skipping {} (no email provided)", user.username);
                continue;
            }
            let password = answer(&mut ask, Prompt::Password { user })?;
            DestinationCredential::Login { email, password }
        } else {
            DestinationCredential::Token(credential)
        };

        planned.push(PlannedMapping {
            user: user.clone(),
            credential,
        });
    }

    if planned.is_empty() {
        return Err(Error::InvalidInput(
            "no valid user mappings created".to_string(),
        ));
    }
    Ok(planned)
}
