// Tracks generator runs started by the trigger endpoint.
//
// A launch returns as soon as the job is started; a background task awaits
// the job and records how it finished so callers can poll for it.

use super::job_models::{JobCompletion, JobRecord, JobStatus, LaunchError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Starts one generator run.
pub trait GeneratorLauncher: Send + Sync {
    fn launch(&self) -> Result<JobCompletion, LaunchError>;
}

/// How long a finished job stays queryable before it is forgotten.
pub const DEFAULT_RETENTION_MINUTES: i64 = 60;

pub struct JobService<L: GeneratorLauncher> {
    launcher: L,
    jobs: Arc<DashMap<Uuid, JobRecord>>,
    retention: ChronoDuration,
}

impl<L: GeneratorLauncher> JobService<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            jobs: Arc::new(DashMap::new()),
            retention: ChronoDuration::minutes(DEFAULT_RETENTION_MINUTES),
        }
    }

    #[cfg(test)]
    pub fn with_retention(mut self, retention: ChronoDuration) -> Self {
        self.retention = retention;
        self
    }

    /// Drop jobs that finished more than `retention` before `now`.
    /// Running jobs are always kept.
    fn prune_finished(&self, now: DateTime<Utc>) {
        let before = self.jobs.len();
        self.jobs.retain(|_, record| match record.finished_at {
            Some(finished_at) => now - finished_at < self.retention,
            None => true,
        });
        let pruned = before.saturating_sub(self.jobs.len());
        if pruned > 0 {
            tracing::debug!("Forgot {} finished job(s)", pruned);
        }
    }

    /// Launch the generator and return the id of the new job.
    ///
    /// Concurrent triggers each get their own run; nothing serializes them.
    pub fn trigger(&self) -> Result<Uuid, LaunchError> {
        self.prune_finished(Utc::now());

        let completion = self.launcher.launch()?;
        let job_id = Uuid::new_v4();

        self.jobs.insert(
            job_id,
            JobRecord {
                status: JobStatus::Running,
                started_at: Utc::now(),
                finished_at: None,
            },
        );
        tracing::info!(%job_id, "Generator job started");

        let jobs = Arc::clone(&self.jobs);
        tokio::spawn(async move {
            let status = match completion.await {
                Ok(()) => {
                    tracing::info!(%job_id, "Generator job succeeded");
                    JobStatus::Succeeded
                }
                Err(reason) => {
                    tracing::error!(%job_id, "Generator job failed: {}", reason);
                    JobStatus::Failed { reason }
                }
            };

            if let Some(mut record) = jobs.get_mut(&job_id) {
                record.status = status;
                record.finished_at = Some(Utc::now());
            }
        });

        Ok(job_id)
    }

    pub fn status(&self, job_id: &Uuid) -> Option<JobRecord> {
        self.jobs.get(job_id).map(|r| r.clone())
    }
}
