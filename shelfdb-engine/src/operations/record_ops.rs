//! Record operations: Add, Edit, Delete, Clear
//!
//! Each operation loads the whole sheet, changes it, and saves it back.
//! Anything that moves rows rebuilds the index from the saved file.

use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::storage::record::Record;
use crate::storage::sheet::RowNumber;

use super::dispatcher::{DeleteTarget, RecordStore};

/// Append a record and index it at the new last row
pub fn add(store: &mut RecordStore, record: Record) -> StoreResult<RowNumber> {
    let id = record.id;
    if store.index.contains(id) {
        return Err(StoreError::DuplicateKey(id));
    }

    let mut sheet = store.load_sheet()?;
    let row = sheet.append(record.to_cells());
    store.save_sheet(&sheet)?;

    store.index.insert(id, row);
    info!("Added record {} at row {}", id, row);
    Ok(row)
}

/// Overwrite all fields of the row holding `id`
pub fn edit_by_key(store: &mut RecordStore, id: i64, record: Record) -> StoreResult<()> {
    let row = store.index.get(id).ok_or(StoreError::KeyNotFound(id))?;

    // Re-keying onto another record's ID would leave two rows with one key
    if record.id != id && store.index.contains(record.id) {
        return Err(StoreError::DuplicateKey(record.id));
    }

    let mut sheet = store.load_sheet()?;
    sheet.set_row(row, record.to_cells())?;
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Edited record {} at row {}", id, row);
    Ok(())
}

/// Delete the row holding `id`
pub fn delete_by_key(store: &mut RecordStore, id: i64) -> StoreResult<()> {
    let row = store.index.get(id).ok_or(StoreError::KeyNotFound(id))?;

    let mut sheet = store.load_sheet()?;
    sheet.delete_row(row)?;
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Deleted record {} from row {}", id, row);
    Ok(())
}

/// Delete the row of an indexed key. Otherwise, including a key that is
/// not indexed, delete every row that has any field whose string form
/// equals the target's.
pub fn delete_by_key_or_value(store: &mut RecordStore, target: &DeleteTarget) -> StoreResult<usize> {
    let mut sheet = store.load_sheet()?;

    let key_row = match target {
        DeleteTarget::Key(id) => store.index.get(*id),
        DeleteTarget::Value(_) => None,
    };
    let value = target.text();

    let rows: Vec<RowNumber> = match key_row {
        Some(row) => vec![row],
        None => sheet
            .data_rows()
            .filter(|(_, cells)| cells.iter().any(|cell| cell.matches_text(&value)))
            .map(|(row, _)| row)
            .collect(),
    };

    if rows.is_empty() {
        return Err(StoreError::NoMatch(value));
    }

    sheet.delete_rows(&rows)?;
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Deleted {} row(s) matching '{}'", rows.len(), value);
    Ok(rows.len())
}

/// Delete every row whose `field` column equals `value`
pub fn delete_by_field(store: &mut RecordStore, field: &str, value: &str) -> StoreResult<usize> {
    let mut sheet = store.load_sheet()?;
    let column = sheet
        .column_of(field)
        .ok_or_else(|| StoreError::FieldNotFound(field.to_string()))?;

    let rows: Vec<RowNumber> = sheet
        .data_rows()
        .filter(|(_, cells)| cells.get(column).is_some_and(|cell| cell.matches_text(value)))
        .map(|(row, _)| row)
        .collect();

    if rows.is_empty() {
        return Err(StoreError::NoMatch(format!("{} = {}", field, value)));
    }

    sheet.delete_rows(&rows)?;
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Deleted {} row(s) where {} = '{}'", rows.len(), field, value);
    Ok(rows.len())
}

/// Delete every row below the header
pub fn clear(store: &mut RecordStore) -> StoreResult<usize> {
    let mut sheet = store.load_sheet()?;
    let deleted = sheet.data_len();
    sheet.clear_data();
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Cleared {} row(s)", deleted);
    Ok(deleted)
}
