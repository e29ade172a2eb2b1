//! Full-scan retrieval: search by value, list all
//!
//! Neither operation uses the key index; both walk every data row.
//! A hand-edited row that does not convert to a record is logged and
//! left out of the results.

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::storage::record::{Cell, Record, COST_COLUMN};
use crate::storage::sheet::RowNumber;

use super::dispatcher::RecordStore;

/// Find records matching `value`.
///
/// A numeric value is compared against Cost only. Anything else is compared
/// against the string form of every field.
pub fn search_by_value(store: &RecordStore, value: &str) -> StoreResult<Vec<Record>> {
    let sheet = store.load_sheet()?;

    let number = value.trim().parse::<f64>().ok();
    let matches = |cells: &[Cell]| match number {
        Some(number) => cells
            .get(COST_COLUMN)
            .and_then(Cell::as_f64)
            .is_some_and(|cost| cost == number),
        None => cells.iter().any(|cell| cell.matches_text(value)),
    };

    let records: Vec<Record> = sheet
        .data_rows()
        .filter(|(_, cells)| matches(*cells))
        .filter_map(|(row, cells)| to_record(row, cells))
        .collect();

    debug!("{} record(s) match '{}'", records.len(), value);
    Ok(records)
}

/// Every record in file order. Blank rows are skipped.
pub fn records(store: &RecordStore) -> StoreResult<Vec<Record>> {
    let sheet = store.load_sheet()?;
    Ok(sheet
        .data_rows()
        .filter(|(_, cells)| !cells.iter().all(Cell::is_empty))
        .filter_map(|(row, cells)| to_record(row, cells))
        .collect())
}

fn to_record(row: RowNumber, cells: &[Cell]) -> Option<Record> {
    match Record::from_cells(cells) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping row {}: {}", row, e);
            None
        }
    }
}
