// In-memory SheetStore used by the service tests.
//
// Each tab is a grid of rows; reads trim trailing empty cells and rows the
// same way the remote API does, so the services see realistic shapes.

use super::{SheetError, SheetStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemorySheet {
    /// Tab title -> rows of cells
    tabs: DashMap<String, Vec<Vec<String>>>,
    /// Every successful cell write, in order
    writes: Mutex<Vec<(String, usize, String, String)>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(sheet: &str, rows: Vec<Vec<&str>>) -> Self {
        let store = Self::new();
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(str::to_string).collect())
            .collect();
        store.tabs.insert(sheet.to_string(), rows);
        store
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn cell(&self, sheet: &str, row: usize, column: &str) -> Option<String> {
        let idx = column_index(column);
        let rows = self.tabs.get(sheet)?;
        let value = rows.value().get(row - 1)?.get(idx).cloned();
        value.filter(|v| !v.is_empty())
    }

    pub fn writes(&self) -> Vec<(String, usize, String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.tabs.contains_key(sheet)
    }
}

fn column_index(column: &str) -> usize {
    column
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize)
        - 1
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

#[async_trait]
impl SheetStore for InMemorySheet {
    async fn read_rows(&self, sheet: &str, _range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        if self.fail_reads {
            return Err(SheetError::Http("connection reset".to_string()));
        }
        let mut rows: Vec<Vec<String>> = self
            .tabs
            .get(sheet)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
            .into_iter()
            .map(|r| trim_trailing_empty(r.into_iter().take(4).collect()))
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn column_len(&self, sheet: &str, column: &str) -> Result<usize, SheetError> {
        if self.fail_reads {
            return Err(SheetError::Http("connection reset".to_string()));
        }
        let idx = column_index(column);
        let len = self
            .tabs
            .get(sheet)
            .map(|rows| {
                rows.value()
                    .iter()
                    .rposition(|r| r.get(idx).is_some_and(|c| !c.is_empty()))
                    .map(|pos| pos + 1)
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        Ok(len)
    }

    async fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError> {
        if self.fail_writes {
            return Err(SheetError::Api {
                status: 403,
                body: "The caller does not have permission".to_string(),
            });
        }
        let idx = column_index(column);
        {
            let mut rows = self.tabs.entry(sheet.to_string()).or_default();
            if rows.len() < row {
                rows.resize(row, Vec::new());
            }
            let cells = &mut rows[row - 1];
            if cells.len() <= idx {
                cells.resize(idx + 1, String::new());
            }
            cells[idx] = value.to_string();
        }
        self.writes.lock().unwrap().push((
            sheet.to_string(),
            row,
            column.to_string(),
            value.to_string(),
        ));
        Ok(())
    }

    async fn ensure_sheet(&self, sheet: &str, _rows: u32, _cols: u32) -> Result<bool, SheetError> {
        match self.tabs.entry(sheet.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Ok(false),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Vec::new());
                Ok(true)
            }
        }
    }
}
