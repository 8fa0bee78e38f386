// The infra module contains implementations of core traits.
// Each remote service gets its own submodule.

#[path = "http/mod.rs"]
pub mod http;

#[path = "google/mod.rs"]
pub mod google;

#[path = "twitter/mod.rs"]
pub mod twitter;

#[path = "jobs/mod.rs"]
pub mod jobs;
