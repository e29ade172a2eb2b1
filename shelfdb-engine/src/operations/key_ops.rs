//! Key-based retrieval

use tracing::debug;

use crate::error::StoreResult;
use crate::storage::record::Record;

use super::dispatcher::RecordStore;

/// Look up `id` in the index and read just that row.
///
/// Returns `Ok(None)` when the key is not indexed.
pub fn search_by_key(store: &RecordStore, id: i64) -> StoreResult<Option<Record>> {
    let Some(row) = store.index.get(id) else {
        return Ok(None);
    };

    let sheet = store.load_sheet()?;
    match sheet.row(row) {
        Some(cells) => {
            debug!("Key {} found at row {}", id, row);
            Record::from_cells(cells).map(Some)
        }
        // Index is stale: the file shrank underneath us
        None => Ok(None),
    }
}
