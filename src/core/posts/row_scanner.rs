use super::posts_models::{PendingRow, SheetRow};

/// Find the first row after the header that isn't marked as published.
///
/// `rows[0]` is the header. Row numbers are 1-based sheet rows, so the row at
/// index `i` is sheet row `i + 1`. Returns `None` when there is nothing to do.
pub fn find_first_unpublished(rows: &[Vec<String>]) -> Option<PendingRow> {
    rows.iter()
        .enumerate()
        .skip(1)
        .map(|(index, cells)| (index, SheetRow::from_cells(cells)))
        .find(|(_, row)| !row.is_published())
        .map(|(index, row)| PendingRow {
            row_number: index + 1,
            row,
        })
}
