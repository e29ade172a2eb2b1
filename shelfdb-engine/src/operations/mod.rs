//! Store operation handlers
//!
//! This module implements every operation the record store offers.

pub mod dispatcher;
pub mod record_ops;
pub mod key_ops;
pub mod scan_ops;
pub mod file_ops;

pub use dispatcher::{DeleteTarget, OperationCode, OperationRequest, OperationResponse, RecordStore};
