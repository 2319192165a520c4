//! import-memos: migrate every memo from a Memos instance into a Notes
//! instance through both applications' REST APIs.
//!
//! Usage:
//!
//! ```text
//! import-memos \
//!   --memos-url http://localhost:8081 \
//!   --memos-token <personal-access-token> \
//!   --notes-url http://localhost:3000 \
//!   [--delay <ms>] [--dry-run]
//! ```

mod cli;
mod console;
mod operator;
mod telemetry;

use anyhow::{anyhow, Context};
use clap::Parser;
use std::io::BufReader;
use std::process::ExitCode;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use memos_import_client::{MemosClient, MemosConfig, NotesClient, NotesConfig};
use memos_import_core::{migrate_all, RunReport, SourceService};

use cli::Args;
use console::Console;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_settings = telemetry::LogSettings::from_env();
    let _file_guard = telemetry::init(&log_settings);

    let run_id = Uuid::now_v7();
    info!(
        %run_id,
        log_format = %log_settings.format,
        log_file = log_settings.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let span = info_span!("import_memos", %run_id, dry_run = args.dry_run);
    match run(args).instrument(span).await {
        Ok(report) => {
            println!("\n{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<RunReport> {
    let endpoints = args
        .endpoints()
        .ok_or_else(|| anyhow!("--memos-url, --memos-token, and --notes-url are required"))?;
    let opts = args.migration_options();

    let memos = MemosClient::new(MemosConfig::from_env(
        &endpoints.memos_url,
        &endpoints.memos_token,
    ))?;
    info!("Connecting to Memos at {}...", endpoints.memos_url);
    memos.ping().await.with_context(|| {
        format!(
            concat!(
                "cannot connect to Memos at {}. ",
                "Make sure the Memos server is running and the URL is correct"
            ),
            endpoints.memos_url
        )
    })?;
    info!("Connected to Memos");

    let users = memos
        .list_users()
        .await
        .context("listing Memos users")?;
    info!("Found {} user(s) in Memos", users.len());

    let mut console = Console::new(BufReader::new(std::io::stdin()), std::io::stdout());
    let plans = operator::collect_plans(&mut console, &users)?;

    let notes_config = NotesConfig::from_env(&endpoints.notes_url);
    let anonymous = NotesClient::new(notes_config.clone())?;
    let mappings = operator::verify_plans(&mut console, plans, &anonymous, |token| {
        NotesClient::new(notes_config.with_token(token))
    })
    .await?;

    info!("Migrating {} user(s)...", mappings.len());
    if opts.pacer.is_enabled() {
        info!(
            "Using {:?} delay between Notes API calls",
            opts.pacer.delay()
        );
    }
    if opts.dry_run {
        info!("Dry run: nothing will be written to Notes");
    }

    Ok(migrate_all(&memos, &mappings, &opts, |mapping| {
        NotesClient::new(notes_config.with_token(&mapping.destination_token))
    })
    .await)
}
