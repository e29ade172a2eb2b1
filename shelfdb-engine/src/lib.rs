//! shelfdb Engine - spreadsheet-backed book record store
//!
//! This crate stores ID / Name / Author / Cost records in the first sheet
//! of an `.xlsx` workbook, with an in-memory key index rebuilt from the
//! file after every structural change.

pub mod error;
pub mod storage;
pub mod operations;

pub use error::{StatusCode, StoreError, StoreResult};
pub use operations::{DeleteTarget, OperationCode, OperationRequest, OperationResponse, RecordStore};
pub use storage::Record;
