//! Storage layer
//!
//! This module handles the on-disk side of the store:
//! - Record and cell types
//! - Reading and writing the backing `.xlsx` sheet
//! - The key index rebuilt from the sheet

pub mod record;
pub mod sheet;
pub mod index;

pub use record::{Cell, Record, FIELD_NAMES};
pub use sheet::{RowNumber, Sheet};
pub use index::KeyIndex;
