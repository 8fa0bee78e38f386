// =============================================================================
// GOOGLE MODULE
// =============================================================================
//
// Spreadsheet access for both pipelines. This lives in the infra layer because
// it handles external I/O (HTTP requests to Google APIs); the core layer only
// sees the `SheetStore` trait.

pub mod service_account;
pub mod sheets_client;

pub use service_account::{CredentialError, ServiceAccountAuth};
pub use sheets_client::GoogleSheetsClient;
