// Shared HTTP plumbing for the infra clients.

#[path = "rate_limit.rs"]
pub mod rate_limit;

pub use rate_limit::{send_with_backoff, RetryPolicy, SendError};
