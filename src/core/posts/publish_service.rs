// The publish pipeline: scan the sheet, post the first pending row, mark it.
//
// At most one row is published per run. Publishing and marking are two
// separate remote calls; if the mark fails after a successful publish the row
// stays eligible and the next run will post it again.

use super::posts_models::{PendingRow, PublishOutcome, PUBLISHED_FLAG};
use super::publisher::{PublishError, Publisher, SocialPlatform};
use super::row_scanner::find_first_unpublished;
use crate::core::sheets::{SheetError, SheetStore};

/// Columns holding text, video URL, affiliate link and the published flag.
pub const POST_RANGE: &str = "A:D";

/// Column that receives the published flag.
pub const FLAG_COLUMN: &str = "D";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read post rows: {0}")]
    Fetch(SheetError),
    #[error("Failed to publish row {row_number}: {source}")]
    Publish {
        row_number: usize,
        source: PublishError,
    },
    #[error("Published row {row_number} but failed to mark it: {source}")]
    WriteBack {
        row_number: usize,
        source: SheetError,
    },
}

pub struct PublishService<S: SheetStore, P: SocialPlatform> {
    sheets: S,
    publisher: Publisher<P>,
    sheet_name: String,
}

impl<S, P> PublishService<S, P>
where
    S: SheetStore,
    P: SocialPlatform,
{
    pub fn new(sheets: S, publisher: Publisher<P>, sheet_name: impl Into<String>) -> Self {
        Self {
            sheets,
            publisher,
            sheet_name: sheet_name.into(),
        }
    }

    /// Find the first row that still needs posting.
    pub async fn next_pending(&self) -> Result<Option<PendingRow>, PipelineError> {
        let rows = self
            .sheets
            .read_rows(&self.sheet_name, POST_RANGE)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read sheet '{}': {}", self.sheet_name, e);
                PipelineError::Fetch(e)
            })?;
        tracing::info!("Fetched {} row(s) from '{}'", rows.len(), self.sheet_name);

        Ok(find_first_unpublished(&rows))
    }

    /// Write the published flag into column D of `row_number`.
    pub async fn mark_published(&self, row_number: usize) -> Result<(), SheetError> {
        self.sheets
            .write_cell(&self.sheet_name, row_number, FLAG_COLUMN, PUBLISHED_FLAG)
            .await
    }

    /// Run the whole pipeline once. With `dry_run` the pending row is
    /// reported but neither published nor marked.
    pub async fn run_once(&self, dry_run: bool) -> Result<PublishOutcome, PipelineError> {
        let Some(pending) = self.next_pending().await? else {
            tracing::info!("No unpublished rows left, nothing to do");
            return Ok(PublishOutcome::NothingToDo);
        };

        let row_number = pending.row_number;
        tracing::info!(row = row_number, "Found unpublished row");

        if dry_run {
            tracing::info!(
                row = row_number,
                "Dry run, would publish: {:?}",
                pending.row.post_pair().primary
            );
            return Ok(PublishOutcome::DryRun(pending));
        }

        let ids = self
            .publisher
            .publish(
                &pending.row.text,
                &pending.row.video_url,
                &pending.row.affiliate_link,
            )
            .await
            .map_err(|source| PipelineError::Publish { row_number, source })?;

        if let Err(source) = self.mark_published(row_number).await {
            tracing::error!(
                row = row_number,
                post_id = %ids.primary_id,
                "Post is live but the row could not be marked; the next run will post it again: {}",
                source
            );
            return Err(PipelineError::WriteBack { row_number, source });
        }

        tracing::info!(row = row_number, "Marked row as published");
        Ok(PublishOutcome::Published { row_number, ids })
    }
}
