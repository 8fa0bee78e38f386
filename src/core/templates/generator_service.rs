use super::template_pool::TEMPLATE_POOL;
use crate::core::sheets::{SheetError, SheetStore};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Column the generated posts are appended to.
pub const TEMPLATE_COLUMN: &str = "A";

/// Grid size used when the target tab has to be created.
const NEW_SHEET_ROWS: u32 = 1000;
const NEW_SHEET_COLS: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Failed to open or create sheet '{sheet}': {source}")]
    Sheet { sheet: String, source: SheetError },
    #[error("Failed to read column A: {0}")]
    Read(SheetError),
    #[error("Failed writing cell A{row} ({written} of {total} written): {source}")]
    Write {
        row: usize,
        written: usize,
        total: usize,
        source: SheetError,
    },
}

/// Pick `count` posts from the template pool.
///
/// Up to the pool size the picks are distinct. Past it, every template is
/// used once and the remainder is drawn with replacement.
pub fn generate_posts<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<&str> = TEMPLATE_POOL.to_vec();

    if count <= pool.len() {
        let (picked, _) = pool.partial_shuffle(rng, count);
        return picked.iter().map(|s| s.to_string()).collect();
    }

    pool.shuffle(rng);
    let mut posts: Vec<String> = pool.iter().map(|s| s.to_string()).collect();
    let extra = count - pool.len();
    posts.extend(
        (0..extra).filter_map(|_| TEMPLATE_POOL.choose(rng).map(|s| s.to_string())),
    );
    posts
}

/// A batch written by one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBatch {
    pub start_row: usize,
    pub posts: Vec<String>,
}

impl GeneratedBatch {
    /// A1 range the batch occupies, e.g. `A5:A14`. `None` for an empty batch.
    pub fn range(&self) -> Option<String> {
        if self.posts.is_empty() {
            return None;
        }
        let end = self.start_row + self.posts.len() - 1;
        Some(format!(
            "{col}{}:{col}{}",
            self.start_row,
            end,
            col = TEMPLATE_COLUMN
        ))
    }
}

/// Appends generated posts below the last filled cell of column A.
pub struct GeneratorService<S: SheetStore> {
    sheets: S,
    sheet_name: String,
    cell_write_delay: Duration,
}

impl<S: SheetStore> GeneratorService<S> {
    pub fn new(sheets: S, sheet_name: impl Into<String>, cell_write_delay: Duration) -> Self {
        Self {
            sheets,
            sheet_name: sheet_name.into(),
            cell_write_delay,
        }
    }

    pub async fn write_batch(&self, count: usize) -> Result<GeneratedBatch, GeneratorError> {
        let created = self
            .sheets
            .ensure_sheet(&self.sheet_name, NEW_SHEET_ROWS, NEW_SHEET_COLS)
            .await
            .map_err(|source| GeneratorError::Sheet {
                sheet: self.sheet_name.clone(),
                source,
            })?;
        if created {
            tracing::info!("Created sheet '{}'", self.sheet_name);
        } else {
            tracing::info!("Opened sheet '{}'", self.sheet_name);
        }

        let filled = self
            .sheets
            .column_len(&self.sheet_name, TEMPLATE_COLUMN)
            .await
            .map_err(GeneratorError::Read)?;
        tracing::info!("Column {} currently has {} cell(s)", TEMPLATE_COLUMN, filled);

        let posts = generate_posts(count, &mut rand::thread_rng());
        tracing::info!("Generated {} post(s)", posts.len());

        let start_row = filled + 1;
        for (i, post) in posts.iter().enumerate() {
            let row = start_row + i;
            if i > 0 && !self.cell_write_delay.is_zero() {
                tokio::time::sleep(self.cell_write_delay).await;
            }
            self.sheets
                .write_cell(&self.sheet_name, row, TEMPLATE_COLUMN, post)
                .await
                .map_err(|source| GeneratorError::Write {
                    row,
                    written: i,
                    total: posts.len(),
                    source,
                })?;
        }

        let batch = GeneratedBatch { start_row, posts };
        match batch.range() {
            Some(range) => tracing::info!("Wrote {} post(s) to {}", batch.posts.len(), range),
            None => tracing::info!("Nothing to write"),
        }
        Ok(batch)
    }
}
