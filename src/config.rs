// Command line and environment configuration.
//
// Every option can come from a flag or its env var (a `.env` file is loaded
// first). Platform secrets are env-only.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::infra::twitter::OAuth1Credentials;

pub const TWITTER_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const TWITTER_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const TWITTER_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Publish spreadsheet rows as linked post pairs, or fill the template sheet.
#[derive(Parser, Debug)]
#[command(name = "sheet_poster", version)]
pub struct Cli {
    /// Spreadsheet holding both the post rows and the template sheet.
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: String,

    /// Log file, appended to on every run.
    #[arg(long, env = "SHEET_POSTER_LOG_FILE", default_value = "sheet_poster.log")]
    pub log_file: PathBuf,

    /// How many times a rate-limited (429) request is retried.
    #[arg(long, env = "RATE_LIMIT_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish the first unpublished row and mark it in column D.
    Publish(PublishArgs),

    /// Append freshly picked template posts to column A of the template sheet.
    Generate(GenerateArgs),

    /// Serve the HTTP endpoint that launches `generate` runs.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    #[arg(long, env = "POSTS_SHEET_NAME", default_value = "Sheet1")]
    pub sheet: String,

    /// Pause between the primary post and its reply.
    #[arg(long, env = "REPLY_DELAY_SECS", default_value_t = 20)]
    pub reply_delay_secs: u64,

    /// Log the row that would be published without posting or writing.
    #[arg(long)]
    pub dry_run: bool,
}

impl PublishArgs {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_secs(self.reply_delay_secs)
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, env = "TEMPLATE_SHEET_NAME", default_value = "自動投稿ポスト一覧")]
    pub sheet: String,

    #[arg(long, env = "GENERATE_COUNT", default_value_t = 10)]
    pub count: usize,

    /// Pause between individual cell writes.
    #[arg(long, env = "CELL_WRITE_DELAY_MS", default_value_t = 1000)]
    pub cell_delay_ms: u64,
}

impl GenerateArgs {
    pub fn cell_write_delay(&self) -> Duration {
        Duration::from_millis(self.cell_delay_ms)
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,
}

impl Cli {
    /// Arguments for a child `generate` run that targets the same spreadsheet.
    /// Sheet, count and delay come from the child's own environment.
    pub fn generate_args(&self) -> Vec<String> {
        vec![
            "--spreadsheet-id".to_string(),
            self.spreadsheet_id.clone(),
            "--log-file".to_string(),
            self.log_file.display().to_string(),
            "--max-retries".to_string(),
            self.max_retries.to_string(),
            "generate".to_string(),
        ]
    }
}

pub fn twitter_credentials_from_env() -> Result<OAuth1Credentials, ConfigError> {
    twitter_credentials_with(|name| std::env::var(name).ok())
}

fn twitter_credentials_with<F>(lookup: F) -> Result<OAuth1Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &'static str| {
        lookup(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(name))
    };

    Ok(OAuth1Credentials {
        consumer_key: required(TWITTER_CONSUMER_KEY)?,
        consumer_secret: required(TWITTER_CONSUMER_SECRET)?,
        access_token: required(TWITTER_ACCESS_TOKEN)?,
        access_token_secret: required(TWITTER_ACCESS_TOKEN_SECRET)?,
    })
}
