pub mod sheet_store;

#[cfg(test)]
pub mod in_memory;

pub use sheet_store::{SheetError, SheetStore};
