// The core module contains all business logic.
// Each feature gets its own submodule; the traits at its edges
// (SheetStore, SocialPlatform, GeneratorLauncher) are implemented in infra.

#[path = "sheets/mod.rs"]
pub mod sheets;

#[path = "posts/mod.rs"]
pub mod posts;

#[path = "templates/mod.rs"]
pub mod templates;

#[path = "jobs/mod.rs"]
pub mod jobs;
