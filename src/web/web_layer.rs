// HTTP adapter for the `serve` subcommand.
// Handlers only translate between HTTP and the core `JobService`.

#[path = "routes.rs"]
pub mod routes;

pub use routes::{router, serve};
