//! Interactive user mapping: selection, credentials, and verification.

use anyhow::{bail, Context};
use std::io::{BufRead, Write};
use tracing::warn;

use memos_import_core::{
    plan_mappings, DestinationCredential, DestinationService, PlannedMapping, SourceUser,
    UserMapping,
};

use crate::console::Console;

/// Ask the operator which users to migrate and with which credentials.
pub fn collect_plans<R, W>(
    console: &mut Console<R, W>,
    users: &[SourceUser],
) -> anyhow::Result<Vec<PlannedMapping>>
where
    R: BufRead,
    W: Write,
{
    Ok(plan_mappings(users, |prompt| console.ask(prompt))?)
}

/// Turn each plan into a mapping with a working token.
///
/// Sign-in credentials are exchanged through `anonymous`. Every token is
/// probed with a client from `connect`; when the probe fails the operator
/// decides whether to keep the user.
pub async fn verify_plans<R, W, D, F>(
    console: &mut Console<R, W>,
    plans: Vec<PlannedMapping>,
    anonymous: &D,
    connect: F,
) -> anyhow::Result<Vec<UserMapping>>
where
    R: BufRead,
    W: Write,
    D: DestinationService,
    F: Fn(&str) -> memos_import_core::Result<D>,
{
    let mut mappings = Vec::with_capacity(plans.len());

    for plan in plans {
        let username = plan.user.username.clone();
        let token = match &plan.credential {
            DestinationCredential::Token(token) => token.clone(),
            DestinationCredential::Login { email, password } => {
                match anonymous.authenticate(email, password).await {
                    Ok(token) => {
                        console.say(format!("  ✓ Signed in to Notes as {}", email));
                        token
                    }
                    Err(e) => {
                        warn!(user = %username, error = %e, "Notes sign-in failed");
                        console.say(format!("  Warning: could not sign in to Notes: {}", e));
                        console.say("  Skipping this user");
                        continue;
                    }
                }
            }
        };

        let client = connect(&token).context("creating Notes client")?;
        match client.ping().await {
            Ok(()) => console.say("  ✓ Notes API connection verified"),
            Err(e) => {
                warn!(user = %username, error = %e, "Notes token check failed");
                console.say(format!(
                    "  Warning: could not connect to Notes with this token: {}",
                    e
                ));
                match console.confirm("Continue anyway?") {
                    Some(true) => {}
                    Some(false) => {
                        console.say("  Skipping this user");
                        continue;
                    }
                    None => bail!("no input received"),
                }
            }
        }

        mappings.push(plan.into_mapping(token));
    }

    if mappings.is_empty() {
        bail!("no valid user mappings created");
    }
    Ok(mappings)
}
