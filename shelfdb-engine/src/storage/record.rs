//! Records and sheet cells
//!
//! A record is one data row of the backing sheet: ID, Name, Author, Cost.
//! Rows are read as loosely typed cells first, since the file can be edited
//! by hand, and only converted to `Record` when a caller asks for one.

use std::fmt;

use crate::error::{StoreError, StoreResult};

/// Column headers, in storage order
pub const FIELD_NAMES: [&str; 4] = ["ID", "Name", "Author", "Cost"];

/// Column of the key field
pub const KEY_COLUMN: usize = 0;

/// Column of the cost field
pub const COST_COLUMN: usize = 3;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Integer value of the cell, if it holds a whole number
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if is_integral(*f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric value of the cell. Text is never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Compare against user input the way a by-value match does: on the
    /// cell's string form.
    pub fn matches_text(&self, value: &str) -> bool {
        self.to_string() == value
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            // 10.0, not 10
            Cell::Float(v) if is_integral(*v) => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64
}

/// A book record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique key
    pub id: i64,
    pub name: String,
    pub author: String,
    pub cost: f64,
}

impl Record {
    /// Create a new record
    pub fn new(id: i64, name: impl Into<String>, author: impl Into<String>, cost: f64) -> Self {
        Record {
            id,
            name: name.into(),
            author: author.into(),
            cost,
        }
    }

    /// Cells in column order
    pub fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.id),
            Cell::Text(self.name.clone()),
            Cell::Text(self.author.clone()),
            Cell::Float(self.cost),
        ]
    }

    /// Build a record from a sheet row.
    ///
    /// Name and Author accept any cell and use its string form, since a
    /// hand-edited sheet may hold a number there. ID must be a whole number
    /// and Cost must be numeric.
    pub fn from_cells(cells: &[Cell]) -> StoreResult<Self> {
        let cell = |col: usize| cells.get(col).unwrap_or(&Cell::Empty);

        let id = cell(KEY_COLUMN).as_i64().ok_or_else(|| {
            StoreError::InvalidRecord(format!("ID '{}' is not an integer", cell(KEY_COLUMN)))
        })?;
        let cost = cell(COST_COLUMN).as_f64().ok_or_else(|| {
            StoreError::InvalidRecord(format!(
                "cost '{}' of record {} is not a number",
                cell(COST_COLUMN),
                id
            ))
        })?;

        Ok(Record {
            id,
            name: cell(1).to_string(),
            author: cell(2).to_string(),
            cost,
        })
    }
}
