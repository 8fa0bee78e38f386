use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Could not locate the generator executable: {0}")]
    Executable(std::io::Error),
    #[error("Failed to spawn generator process: {0}")]
    Spawn(std::io::Error),
}

/// Resolves once a launched job has finished, with the failure reason if any.
pub type JobCompletion = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
