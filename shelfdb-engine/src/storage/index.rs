//! Key index
//!
//! Maps each record ID to the row that holds it. The index is never
//! persisted; it is rebuilt by scanning the sheet.

use std::collections::HashMap;

use tracing::warn;

use super::record::KEY_COLUMN;
use super::sheet::{RowNumber, Sheet};

/// ID to row number mapping
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    rows: HashMap<i64, RowNumber>,
}

impl KeyIndex {
    pub fn new() -> Self {
        KeyIndex {
            rows: HashMap::new(),
        }
    }

    /// Scan every data row of `sheet` and index its key.
    ///
    /// Rows without an integer in the key column are skipped. If the same
    /// ID appears twice (only possible after an outside edit), the later
    /// row wins.
    pub fn build(sheet: &Sheet) -> Self {
        let mut index = KeyIndex::new();
        for (row, cells) in sheet.data_rows() {
            let key = cells.get(KEY_COLUMN);
            match key.and_then(|cell| cell.as_i64()) {
                Some(id) => {
                    if let Some(previous) = index.rows.insert(id, row) {
                        warn!("Key {} appears in rows {} and {}", id, previous, row);
                    }
                }
                None if cells.iter().all(|cell| cell.is_empty()) => {}
                None => warn!(
                    "Row {} has no integer key ('{}'), not indexed",
                    row,
                    key.map(ToString::to_string).unwrap_or_default()
                ),
            }
        }
        index
    }

    /// Row holding `id`
    pub fn get(&self, id: i64) -> Option<RowNumber> {
        self.rows.get(&id).copied()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Record that `id` now lives at `row`
    pub fn insert(&mut self, id: i64, row: RowNumber) {
        self.rows.insert(id, row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
