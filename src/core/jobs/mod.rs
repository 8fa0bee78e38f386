pub mod job_models;
pub mod job_service;

pub use job_models::{JobCompletion, LaunchError};
pub use job_service::{GeneratorLauncher, JobService};
