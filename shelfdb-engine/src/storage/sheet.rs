//! Backing sheet I/O
//!
//! The store lives in the first worksheet of an `.xlsx` workbook:
//! - Row 1: header `ID | Name | Author | Cost`, starting at A1
//! - Rows 2..: one record per row
//!
//! A `Sheet` is the whole worksheet held in memory for the span of one
//! operation. Row numbers are 1-based, matching the spreadsheet view.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use tracing::debug;

use super::record::{Cell, FIELD_NAMES, KEY_COLUMN};
use crate::error::{StoreError, StoreResult};

/// 1-based row position in the sheet (row 1 is the header)
pub type RowNumber = u32;

/// Row number of the header
pub const HEADER_ROW: RowNumber = 1;

/// Row number of the first data row
pub const FIRST_DATA_ROW: RowNumber = 2;

/// In-memory copy of the backing worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Create a sheet holding only the header row
    pub fn new() -> Self {
        Sheet {
            rows: vec![FIELD_NAMES.iter().map(|&name| Cell::from(name)).collect()],
        }
    }

    /// Read the first worksheet of the workbook at `path`
    pub fn load(path: &Path) -> StoreResult<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| StoreError::InvalidFormat("workbook has no worksheets".into()))??;

        match range.start() {
            Some((0, 0)) => {}
            Some((row, col)) => {
                return Err(StoreError::InvalidFormat(format!(
                    "sheet must start at A1, found data starting at row {} column {}",
                    row + 1,
                    col + 1
                )))
            }
            None => return Err(StoreError::InvalidFormat("sheet is empty".into())),
        }

        let mut rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| {
                let mut cells: Vec<Cell> = row.iter().map(cell_from_data).collect();
                while cells.last().is_some_and(Cell::is_empty) {
                    cells.pop();
                }
                cells
            })
            .collect();

        let header_ok = rows.first().is_some_and(|header| {
            header.len() == FIELD_NAMES.len()
                && header
                    .iter()
                    .zip(FIELD_NAMES)
                    .all(|(cell, name)| cell.to_string().trim() == name)
        });
        if !header_ok {
            return Err(StoreError::InvalidFormat(format!(
                "{} does not start with the header {}",
                path.display(),
                FIELD_NAMES.join(", ")
            )));
        }

        // Spreadsheets store every number as a float
        for row in rows.iter_mut().skip(1) {
            if let Some(cell) = row.get_mut(KEY_COLUMN) {
                if matches!(cell, Cell::Float(_)) {
                    if let Some(id) = cell.as_i64() {
                        *cell = Cell::Int(id);
                    }
                }
            }
        }

        debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Sheet { rows })
    }

    /// Write the whole sheet to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (r, row) in self.rows.iter().enumerate() {
            let r = r as u32;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Int(i) => {
                        worksheet.write_number(r, c, *i as f64)?;
                    }
                    Cell::Float(f) => {
                        worksheet.write_number(r, c, *f)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s.as_str())?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                }
            }
        }

        workbook.save(path)?;
        debug!("Saved {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Header cells
    pub fn header(&self) -> &[Cell] {
        &self.rows[0]
    }

    /// Zero-based column of the header named `name`
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.header().iter().position(|cell| cell.matches_text(name))
    }

    /// Cells of a row, if it exists
    pub fn row(&self, row: RowNumber) -> Option<&[Cell]> {
        let idx = (row as usize).checked_sub(1)?;
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// All rows including the header, in file order
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Data rows with their row numbers
    pub fn data_rows(&self) -> impl Iterator<Item = (RowNumber, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, cells)| (idx as RowNumber + 1, cells.as_slice()))
    }

    /// Last row number in use (the header row when there is no data)
    pub fn max_row(&self) -> RowNumber {
        self.rows.len() as RowNumber
    }

    /// Append a row, returning its row number
    pub fn append(&mut self, cells: Vec<Cell>) -> RowNumber {
        self.rows.push(cells);
        self.max_row()
    }

    /// Overwrite the cells of an existing data row
    pub fn set_row(&mut self, row: RowNumber, cells: Vec<Cell>) -> StoreResult<()> {
        let idx = self.data_index(row)?;
        self.rows[idx] = cells;
        Ok(())
    }

    /// Delete a data row, shifting later rows up by one
    pub fn delete_row(&mut self, row: RowNumber) -> StoreResult<()> {
        let idx = self.data_index(row)?;
        self.rows.remove(idx);
        Ok(())
    }

    /// Delete several data rows. Highest row goes first so earlier
    /// deletions do not shift the rows still to be deleted.
    pub fn delete_rows(&mut self, rows: &[RowNumber]) -> StoreResult<()> {
        let mut rows = rows.to_vec();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();
        for row in rows {
            self.delete_row(row)?;
        }
        Ok(())
    }

    /// Drop every row below the header
    pub fn clear_data(&mut self) {
        self.rows.truncate(1);
    }

    /// Number of data rows
    pub fn data_len(&self) -> usize {
        self.rows.len() - 1
    }

    fn data_index(&self, row: RowNumber) -> StoreResult<usize> {
        if row < FIRST_DATA_ROW || row > self.max_row() {
            return Err(StoreError::InvalidOperation(format!(
                "row {} is not a data row",
                row
            )));
        }
        Ok(row as usize - 1)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}
