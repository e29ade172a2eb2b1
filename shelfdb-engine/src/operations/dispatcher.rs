//! Operation dispatcher - routes store operations to handlers
//!
//! `RecordStore` is the main entry point. Callers either use its typed
//! methods directly or build an `OperationRequest` and hand it to
//! `execute`, which never fails: errors come back as a status code plus
//! message, ready to show to a user.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StatusCode, StoreError, StoreResult};
use crate::storage::index::KeyIndex;
use crate::storage::record::Record;
use crate::storage::sheet::Sheet;

/// Store operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationCode {
    // Record operations
    Add,
    Edit,
    Delete,
    DeleteByKey,
    DeleteByField,
    Clear,

    // Retrieval
    SearchByKey,
    SearchByValue,
    List,

    // File operations
    Backup,
    Restore,
    Export,
}

impl OperationCode {
    /// Check if this operation rewrites the backing file
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            OperationCode::Add
                | OperationCode::Edit
                | OperationCode::Delete
                | OperationCode::DeleteByKey
                | OperationCode::DeleteByField
                | OperationCode::Clear
                | OperationCode::Restore
        )
    }
}

/// What `delete_by_key_or_value` is asked to remove
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    /// An ID: deletes that row when indexed, otherwise falls back to a
    /// scan for the ID's string form
    Key(i64),
    /// Any other entry: always a scan of every field
    Value(String),
}

impl DeleteTarget {
    /// String form compared against cells when scanning
    pub fn text(&self) -> String {
        match self {
            DeleteTarget::Key(id) => id.to_string(),
            DeleteTarget::Value(value) => value.clone(),
        }
    }
}

impl From<i64> for DeleteTarget {
    fn from(id: i64) -> Self {
        DeleteTarget::Key(id)
    }
}

impl From<&str> for DeleteTarget {
    fn from(value: &str) -> Self {
        DeleteTarget::Value(value.to_string())
    }
}

impl From<String> for DeleteTarget {
    fn from(value: String) -> Self {
        DeleteTarget::Value(value)
    }
}

/// Request structure for operations
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub operation: OperationCode,
    /// Key for key-based operations (search, strict delete, edit target)
    pub key: Option<i64>,
    /// Free-form value for by-value search and delete
    pub value: Option<String>,
    /// Column name for delete-by-field
    pub field: Option<String>,
    /// Record for add and edit
    pub record: Option<Record>,
    /// Target file for backup, restore and export
    pub path: Option<PathBuf>,
}

impl OperationRequest {
    pub fn new(operation: OperationCode) -> Self {
        OperationRequest {
            operation,
            key: None,
            value: None,
            field: None,
            record: None,
            path: None,
        }
    }

    pub fn with_key(mut self, key: i64) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Response structure for operations
#[derive(Debug, Clone)]
pub struct OperationResponse {
    pub status: StatusCode,
    /// Records found by a read operation
    pub records: Vec<Record>,
    /// Rows written, deleted or exported
    pub affected: usize,
    /// Error text when `status` is not success
    pub message: Option<String>,
}

impl OperationResponse {
    pub fn success() -> Self {
        OperationResponse {
            status: StatusCode::Success,
            records: Vec::new(),
            affected: 0,
            message: None,
        }
    }

    pub fn error(err: &StoreError) -> Self {
        OperationResponse {
            status: err.status_code(),
            records: Vec::new(),
            affected: 0,
            message: Some(err.to_string()),
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_affected(mut self, affected: usize) -> Self {
        self.affected = affected;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// The record store - owns the backing file path and the key index
pub struct RecordStore {
    pub(crate) path: PathBuf,
    pub(crate) index: KeyIndex,
}

impl RecordStore {
    /// Open the store at `path`, creating a header-only file if none exists
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            Sheet::new().save(&path)?;
            info!("Created new store file {}", path.display());
        }

        let mut store = RecordStore {
            path,
            index: KeyIndex::new(),
        };
        store.rebuild_index()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check if a record with this key exists
    pub fn contains_key(&self, id: i64) -> bool {
        self.index.contains(id)
    }

    /// Re-scan the backing file and replace the index
    pub fn rebuild_index(&mut self) -> StoreResult<()> {
        let sheet = self.load_sheet()?;
        self.index = KeyIndex::build(&sheet);
        debug!("Indexed {} keys from {}", self.index.len(), self.path.display());
        Ok(())
    }

    pub(crate) fn load_sheet(&self) -> StoreResult<Sheet> {
        Sheet::load(&self.path)
    }

    pub(crate) fn save_sheet(&self, sheet: &Sheet) -> StoreResult<()> {
        sheet.save(&self.path)
    }

    /// Execute an operation, folding any error into the response
    pub fn execute(&mut self, request: OperationRequest) -> OperationResponse {
        let result = match request.operation {
            OperationCode::Add => self.op_add(&request),
            OperationCode::Edit => self.op_edit(&request),
            OperationCode::Delete => self.op_delete(&request),
            OperationCode::DeleteByKey => self.op_delete_by_key(&request),
            OperationCode::DeleteByField => self.op_delete_by_field(&request),
            OperationCode::Clear => self.op_clear(&request),
            OperationCode::SearchByKey => self.op_search_by_key(&request),
            OperationCode::SearchByValue => self.op_search_by_value(&request),
            OperationCode::List => self.op_list(&request),
            OperationCode::Backup => self.op_backup(&request),
            OperationCode::Restore => self.op_restore(&request),
            OperationCode::Export => self.op_export(&request),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                debug!("{:?} failed: {}", request.operation, e);
                OperationResponse::error(&e)
            }
        }
    }
}

// Typed operations - these call into the specific handler modules
impl RecordStore {
    /// Append a new record. Fails if its ID is already present.
    pub fn add(&mut self, record: Record) -> StoreResult<()> {
        super::record_ops::add(self, record).map(|_| ())
    }

    /// Overwrite the record stored under `id`
    pub fn edit_by_key(&mut self, id: i64, record: Record) -> StoreResult<()> {
        super::record_ops::edit_by_key(self, id, record)
    }

    /// Delete the record with key `id`
    pub fn delete_by_key(&mut self, id: i64) -> StoreResult<()> {
        super::record_ops::delete_by_key(self, id)
    }

    /// Delete the row of an indexed key, otherwise every row with a field
    /// equal to the target's string form. Returns the number of deleted rows.
    pub fn delete_by_key_or_value(&mut self, target: impl Into<DeleteTarget>) -> StoreResult<usize> {
        super::record_ops::delete_by_key_or_value(self, &target.into())
    }

    /// Delete every row whose `field` column equals `value`
    pub fn delete_by_field(&mut self, field: &str, value: &str) -> StoreResult<usize> {
        super::record_ops::delete_by_field(self, field, value)
    }

    /// Delete every record, keeping the header
    pub fn clear(&mut self) -> StoreResult<usize> {
        super::record_ops::clear(self)
    }

    /// Look up a record by key
    pub fn search_by_key(&self, id: i64) -> StoreResult<Option<Record>> {
        super::key_ops::search_by_key(self, id)
    }

    /// Linear scan for records matching `value`
    pub fn search_by_value(&self, value: &str) -> StoreResult<Vec<Record>> {
        super::scan_ops::search_by_value(self, value)
    }

    /// All records in file order
    pub fn records(&self) -> StoreResult<Vec<Record>> {
        super::scan_ops::records(self)
    }

    /// Copy the backing file to `dest`
    pub fn backup(&self, dest: &Path) -> StoreResult<()> {
        super::file_ops::backup(self, dest)
    }

    /// Replace the backing file with the backup at `src`
    pub fn restore(&mut self, src: &Path) -> StoreResult<()> {
        super::file_ops::restore(self, src)
    }

    /// Write every row as tab-separated text. Returns the line count.
    pub fn export_to_text(&self, dest: &Path) -> StoreResult<usize> {
        super::file_ops::export_to_text(self, dest)
    }
}

fn missing(what: &str, op: OperationCode) -> StoreError {
    StoreError::InvalidOperation(format!("{:?} requires a {}", op, what))
}

// Request unpacking - each op pulls its arguments and calls the handler
impl RecordStore {
    fn op_add(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let record = req.record.clone().ok_or_else(|| missing("record", req.operation))?;
        self.add(record)?;
        Ok(OperationResponse::success().with_affected(1))
    }

    fn op_edit(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let record = req.record.clone().ok_or_else(|| missing("record", req.operation))?;
        let key = req.key.unwrap_or(record.id);
        self.edit_by_key(key, record)?;
        Ok(OperationResponse::success().with_affected(1))
    }

    fn op_delete(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let target = match (req.key, &req.value) {
            (Some(key), _) => DeleteTarget::Key(key),
            (None, Some(value)) => DeleteTarget::Value(value.clone()),
            (None, None) => return Err(missing("key or value", req.operation)),
        };
        let deleted = self.delete_by_key_or_value(target)?;
        Ok(OperationResponse::success().with_affected(deleted))
    }

    fn op_delete_by_key(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let key = req.key.ok_or_else(|| missing("key", req.operation))?;
        self.delete_by_key(key)?;
        Ok(OperationResponse::success().with_affected(1))
    }

    fn op_delete_by_field(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let field = req.field.as_deref().ok_or_else(|| missing("field", req.operation))?;
        let value = req.value.as_deref().ok_or_else(|| missing("value", req.operation))?;
        let deleted = self.delete_by_field(field, value)?;
        Ok(OperationResponse::success().with_affected(deleted))
    }

    fn op_clear(&mut self, _req: &OperationRequest) -> StoreResult<OperationResponse> {
        let deleted = self.clear()?;
        Ok(OperationResponse::success().with_affected(deleted))
    }

    fn op_search_by_key(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let key = req.key.ok_or_else(|| missing("key", req.operation))?;
        let records: Vec<Record> = self.search_by_key(key)?.into_iter().collect();
        Ok(OperationResponse::success().with_records(records))
    }

    fn op_search_by_value(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let value = req.value.as_deref().ok_or_else(|| missing("value", req.operation))?;
        let records = self.search_by_value(value)?;
        Ok(OperationResponse::success().with_records(records))
    }

    fn op_list(&mut self, _req: &OperationRequest) -> StoreResult<OperationResponse> {
        let records = self.records()?;
        let count = records.len();
        Ok(OperationResponse::success().with_records(records).with_affected(count))
    }

    fn op_backup(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let path = req.path.as_deref().ok_or_else(|| missing("path", req.operation))?;
        self.backup(path)?;
        Ok(OperationResponse::success())
    }

    fn op_restore(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let path = req.path.as_deref().ok_or_else(|| missing("path", req.operation))?;
        self.restore(path)?;
        Ok(OperationResponse::success().with_affected(self.len()))
    }

    fn op_export(&mut self, req: &OperationRequest) -> StoreResult<OperationResponse> {
        let path = req.path.as_deref().ok_or_else(|| missing("path", req.operation))?;
        let lines = self.export_to_text(path)?;
        Ok(OperationResponse::success().with_affected(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dune() -> Record {
        Record::new(1, "Dune", "Herbert", 12.5)
    }

    #[test]
    fn test_open_creates_header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.xlsx");

        let store = RecordStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.is_empty());

        let sheet = Sheet::load(&path).unwrap();
        assert_eq!(sheet.max_row(), 1);
    }

    #[test]
    fn test_execute_add_and_search() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();

        let response = store.execute(OperationRequest::new(OperationCode::Add).with_record(dune()));
        assert!(response.is_success());
        assert_eq!(response.affected, 1);

        let response = store.execute(OperationRequest::new(OperationCode::SearchByKey).with_key(1));
        assert_eq!(response.status, StatusCode::Success);
        assert_eq!(response.records, vec![dune()]);

        let response = store.execute(OperationRequest::new(OperationCode::SearchByKey).with_key(2));
        assert!(response.is_success());
        assert!(response.records.is_empty());
    }

    #[test]
    fn test_execute_reports_errors_as_status() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();
        store.add(dune()).unwrap();

        let response = store.execute(OperationRequest::new(OperationCode::Add).with_record(dune()));
        assert_eq!(response.status, StatusCode::DuplicateKey);
        assert_eq!(response.message.as_deref(), Some("Key 1 already exists"));

        let response = store.execute(OperationRequest::new(OperationCode::DeleteByKey).with_key(9));
        assert_eq!(response.status, StatusCode::KeyNotFound);

        let response = store.execute(OperationRequest::new(OperationCode::Delete).with_value("Nobody"));
        assert_eq!(response.status, StatusCode::NoMatch);

        let response = store.execute(OperationRequest::new(OperationCode::Restore));
        assert_eq!(response.status, StatusCode::InvalidOperation);
    }

    #[test]
    fn test_execute_list_and_clear() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();
        store.add(dune()).unwrap();
        store.add(Record::new(2, "Emma", "Austen", 8.0)).unwrap();

        let response = store.execute(OperationRequest::new(OperationCode::List));
        assert_eq!(response.records.len(), 2);

        let response = store.execute(OperationRequest::new(OperationCode::Clear));
        assert_eq!(response.affected, 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_execute_delete_by_key_and_by_value() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();
        store.add(Record::new(5, "Dune", "Herbert", 12.5)).unwrap();
        store.add(Record::new(9, "5", "Anon", 1.0)).unwrap();

        let response = store.execute(OperationRequest::new(OperationCode::Delete).with_key(5));
        assert_eq!(response.affected, 1);
        assert!(store.contains_key(9));

        store.add(Record::new(5, "Dune", "Herbert", 12.5)).unwrap();
        let response = store.execute(OperationRequest::new(OperationCode::Delete).with_value("5"));
        assert_eq!(response.affected, 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_operation_classes() {
        assert!(OperationCode::Restore.is_write());
        assert!(!OperationCode::Backup.is_write());
        assert!(!OperationCode::List.is_write());
    }
}
