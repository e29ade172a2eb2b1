//! Status codes and error handling
//!
//! Every failed store operation maps to a numeric status code so the front
//! end can tell "not found" apart from "already exists" without matching on
//! error text.

use std::path::PathBuf;

use thiserror::Error;

/// Store status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// Operation completed successfully
    Success = 0,
    /// Invalid or incomplete operation request
    InvalidOperation = 1,
    /// I/O error occurred
    IoError = 2,
    /// Key value not found
    KeyNotFound = 4,
    /// Duplicate key value
    DuplicateKey = 5,
    /// No record matched a by-value lookup
    NoMatch = 9,
    /// File not found
    FileNotFound = 12,
    /// Column name not present in the header
    FieldNotFound = 13,
    /// Record fields could not be interpreted
    InvalidRecord = 28,
    /// Not a store file
    NotStoreFile = 30,
    /// Unknown status code
    Unknown = 65535,
}

impl StatusCode {
    /// Get the raw status code value
    pub fn as_raw(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success status
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_raw(), match self {
            StatusCode::Success => "Success",
            StatusCode::InvalidOperation => "Invalid operation",
            StatusCode::IoError => "I/O error",
            StatusCode::KeyNotFound => "Key value not found",
            StatusCode::DuplicateKey => "Duplicate key value",
            StatusCode::NoMatch => "No matching records",
            StatusCode::FileNotFound => "File not found",
            StatusCode::FieldNotFound => "Field not found",
            StatusCode::InvalidRecord => "Invalid record",
            StatusCode::NotStoreFile => "Not a store file",
            StatusCode::Unknown => "Error",
        })
    }
}

/// Main error type for the record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key {0} not found")]
    KeyNotFound(i64),

    #[error("Key {0} already exists")]
    DuplicateKey(i64),

    #[error("No records matching '{0}'")]
    NoMatch(String),

    #[error("Field '{0}' not found")]
    FieldNotFound(String),

    #[error("Backup file {} does not exist", .0.display())]
    BackupNotFound(PathBuf),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read sheet: {0}")]
    SheetRead(#[from] calamine::XlsxError),

    #[error("Failed to write sheet: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl StoreError {
    /// Get the status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::KeyNotFound(_) => StatusCode::KeyNotFound,
            StoreError::DuplicateKey(_) => StatusCode::DuplicateKey,
            StoreError::NoMatch(_) => StatusCode::NoMatch,
            StoreError::FieldNotFound(_) => StatusCode::FieldNotFound,
            StoreError::BackupNotFound(_) => StatusCode::FileNotFound,
            StoreError::InvalidOperation(_) => StatusCode::InvalidOperation,
            StoreError::InvalidRecord(_) => StatusCode::InvalidRecord,
            StoreError::InvalidFormat(_) | StoreError::SheetRead(_) => StatusCode::NotStoreFile,
            StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::FileNotFound
            }
            StoreError::Io(_) | StoreError::SheetWrite(_) => StatusCode::IoError,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::KeyNotFound.as_raw(), 4);
        assert_eq!(StatusCode::NoMatch.to_string(), "9 (No matching records)");
        assert!(StatusCode::Success.is_success());
        assert!(!StatusCode::DuplicateKey.is_success());
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(StoreError::KeyNotFound(3).status_code(), StatusCode::KeyNotFound);
        assert_eq!(StoreError::DuplicateKey(3).status_code(), StatusCode::DuplicateKey);
        assert_eq!(
            StoreError::BackupNotFound(PathBuf::from("x.xlsx")).status_code(),
            StatusCode::FileNotFound
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(StoreError::from(io).status_code(), StatusCode::FileNotFound);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(StoreError::DuplicateKey(7).to_string(), "Key 7 already exists");
        assert_eq!(
            StoreError::BackupNotFound(PathBuf::from("old.xlsx")).to_string(),
            "Backup file old.xlsx does not exist"
        );
    }
}
