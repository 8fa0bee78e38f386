// Entry point for sheet_poster.
//
// **Architecture Overview:**
// - `core/` = Business logic (row scanning, publishing, template generation, jobs)
// - `infra/` = Implementations of core traits (Google Sheets, posting API, child processes)
// - `web/` = HTTP adapter for the trigger endpoint
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize logging
// 3. Wire services together (dependency injection)
// 4. Run the chosen subcommand and turn its result into an exit status

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{Cli, Command, GenerateArgs, PublishArgs, ServeArgs};
use crate::core::jobs::JobService;
use crate::core::posts::{PublishOutcome, PublishService, Publisher};
use crate::core::templates::GeneratorService;
use crate::infra::google::{GoogleSheetsClient, ServiceAccountAuth};
use crate::infra::http::RetryPolicy;
use crate::infra::jobs::SubprocessLauncher;
use crate::infra::twitter::TwitterApiClient;

async fn sheets_client(cli: &Cli) -> anyhow::Result<GoogleSheetsClient> {
    let auth = ServiceAccountAuth::from_env()
        .await
        .context("Failed to load Google service account credentials")?;
    tracing::info!("Authenticated as {}", auth.client_email());

    Ok(GoogleSheetsClient::new(auth, cli.spreadsheet_id.clone())
        .with_retry(RetryPolicy::new(cli.max_retries)))
}

async fn run_publish(cli: &Cli, args: &PublishArgs) -> anyhow::Result<()> {
    let sheets = sheets_client(cli).await?;

    let credentials = config::twitter_credentials_from_env()?;
    let platform = TwitterApiClient::new(credentials)
        .context("Failed to build posting client")?
        .with_retry(RetryPolicy::new(cli.max_retries));

    let service = PublishService::new(
        sheets,
        Publisher::new(platform, args.reply_delay()),
        args.sheet.clone(),
    );

    match service.run_once(args.dry_run).await? {
        PublishOutcome::NothingToDo => {}
        PublishOutcome::DryRun(pending) => {
            tracing::info!("Dry run finished, row {} left untouched", pending.row_number);
        }
        PublishOutcome::Published { row_number, ids } => {
            tracing::info!(
                "Published row {} as post {} with reply {}",
                row_number,
                ids.primary_id,
                ids.reply_id
            );
        }
    }
    Ok(())
}

async fn run_generate(cli: &Cli, args: &GenerateArgs) -> anyhow::Result<()> {
    let sheets = sheets_client(cli).await?;
    let service = GeneratorService::new(sheets, args.sheet.clone(), args.cell_write_delay());

    let batch = service.write_batch(args.count).await?;
    match batch.range() {
        Some(range) => tracing::info!(
            "Wrote {} post(s) to '{}'!{}",
            batch.posts.len(),
            args.sheet,
            range
        ),
        None => tracing::info!("No posts requested for '{}'", args.sheet),
    }
    Ok(())
}

async fn run_serve(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let launcher = SubprocessLauncher::current_exe(cli.generate_args())?;
    let jobs = Arc::new(JobService::new(launcher));

    web::serve(args.bind, jobs)
        .await
        .with_context(|| format!("Trigger endpoint on {} failed", args.bind))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_file) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Publish(args) => run_publish(&cli, args).await,
        Command::Generate(args) => run_generate(&cli, args).await,
        Command::Serve(args) => run_serve(&cli, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
