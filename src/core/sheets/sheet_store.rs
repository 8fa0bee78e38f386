use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Sheets API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Rate limited after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// The tabular operations the pipelines need from a spreadsheet backend.
///
/// Rows and columns are 1-based like the A1 notation the remote API speaks.
/// `column` is a letter such as `"A"` or `"D"`.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read a rectangular range (e.g. `"A:D"`) row-major. Trailing empty
    /// cells in a row may be missing, and trailing empty rows are dropped.
    async fn read_rows(&self, sheet: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError>;

    /// Number of cells in `column` up to and including the last non-empty one.
    async fn column_len(&self, sheet: &str, column: &str) -> Result<usize, SheetError>;

    /// Overwrite a single cell.
    async fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError>;

    /// Make sure a tab with this title exists, creating it with the given grid
    /// size if it doesn't. Returns `true` when the tab was created.
    async fn ensure_sheet(&self, sheet: &str, rows: u32, cols: u32) -> Result<bool, SheetError>;
}

// Lets several services share one store behind an `Arc`.
#[async_trait]
impl<T: SheetStore + ?Sized> SheetStore for std::sync::Arc<T> {
    async fn read_rows(&self, sheet: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        (**self).read_rows(sheet, range).await
    }

    async fn column_len(&self, sheet: &str, column: &str) -> Result<usize, SheetError> {
        (**self).column_len(sheet, column).await
    }

    async fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError> {
        (**self).write_cell(sheet, row, column, value).await
    }

    async fn ensure_sheet(&self, sheet: &str, rows: u32, cols: u32) -> Result<bool, SheetError> {
        (**self).ensure_sheet(sheet, rows, cols).await
    }
}
