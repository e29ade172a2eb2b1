//! Subcommands and how they map onto store operations

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};

use shelfdb_engine::{DeleteTarget, OperationCode, OperationRequest, OperationResponse, RecordStore};

use crate::form::{FormInput, SearchTarget};
use crate::render::render_table;

/// The four record form entries
#[derive(Args, Debug, Clone, Default)]
pub struct FormFields {
    /// Record ID
    #[arg(long, default_value = "")]
    pub id: String,

    /// Book name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Author
    #[arg(long, default_value = "")]
    pub author: String,

    /// Cost
    #[arg(long, default_value = "")]
    pub cost: String,
}

impl From<&FormFields> for FormInput {
    fn from(fields: &FormFields) -> Self {
        FormInput {
            id: fields.id.clone(),
            name: fields.name.clone(),
            author: fields.author.clone(),
            cost: fields.cost.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a record (all four fields required)
    Add(FormFields),

    /// Search by ID, or by the first filled field
    Search(FormFields),

    /// Delete by ID, or every record matching the first filled field
    Delete(FormFields),

    /// Overwrite the record with the given ID
    Edit {
        #[command(flatten)]
        fields: FormFields,

        /// Current ID, when the edit changes the record's ID
        #[arg(long)]
        key: Option<i64>,
    },

    /// Show every record
    List,

    /// Copy the store file to PATH
    Backup { path: PathBuf },

    /// Replace the store file with the backup at PATH
    Restore { path: PathBuf },

    /// Write all rows as tab-separated text to PATH
    Export { path: PathBuf },

    /// Delete every record
    Clear,
}

impl Command {
    /// Turn the command and its form entries into a store request
    pub fn to_request(&self) -> Result<OperationRequest> {
        let request = match self {
            Command::Add(fields) => OperationRequest::new(OperationCode::Add)
                .with_record(FormInput::from(fields).to_record()?),
            Command::Search(fields) => match FormInput::from(fields).search_target() {
                Some(SearchTarget::Key(key)) => {
                    OperationRequest::new(OperationCode::SearchByKey).with_key(key)
                }
                Some(SearchTarget::Value(value)) => {
                    OperationRequest::new(OperationCode::SearchByValue).with_value(value)
                }
                None => bail!("Nothing to search for"),
            },
            Command::Delete(fields) => {
                let request = OperationRequest::new(OperationCode::Delete);
                match FormInput::from(fields).delete_target()? {
                    DeleteTarget::Key(key) => request.with_key(key),
                    DeleteTarget::Value(value) => request.with_value(value),
                }
            }
            Command::Edit { fields, key } => {
                let record = FormInput::from(fields).to_record()?;
                let key = key.unwrap_or(record.id);
                OperationRequest::new(OperationCode::Edit)
                    .with_key(key)
                    .with_record(record)
            }
            Command::List => OperationRequest::new(OperationCode::List),
            Command::Backup { path } => {
                OperationRequest::new(OperationCode::Backup).with_path(path.clone())
            }
            Command::Restore { path } => {
                OperationRequest::new(OperationCode::Restore).with_path(path.clone())
            }
            Command::Export { path } => {
                OperationRequest::new(OperationCode::Export).with_path(path.clone())
            }
            Command::Clear => OperationRequest::new(OperationCode::Clear),
        };
        Ok(request)
    }
}

/// Run one command against the store and return the text to print.
///
/// A failed operation becomes an error carrying the store's message.
pub fn run(store: &mut RecordStore, command: &Command) -> Result<String> {
    let request = command.to_request()?;
    let operation = request.operation;
    let response = store.execute(request);

    if !response.is_success() {
        return Err(anyhow!(response
            .message
            .unwrap_or_else(|| response.status.to_string())));
    }

    let mut out = match command {
        Command::Search(_) if response.records.is_empty() => "No records found\n".to_string(),
        Command::Search(_) | Command::List => render_table(&response.records),
        Command::Backup { path } => format!("Backup created at {}\n", path.display()),
        Command::Export { path } => {
            format!("Exported {} lines to {}\n", response.affected, path.display())
        }
        _ => summary(operation, &response),
    };

    // Mutations reprint the whole table, like a form reloading its view
    if operation.is_write() {
        out.push_str(&render_table(&store.records()?));
    }
    Ok(out)
}

fn summary(operation: OperationCode, response: &OperationResponse) -> String {
    match operation {
        OperationCode::Add => "Record added\n".to_string(),
        OperationCode::Edit => "Record updated\n".to_string(),
        OperationCode::Restore => {
            format!("Store restored ({} records)\n", response.affected)
        }
        OperationCode::Clear => format!("All records deleted ({})\n", response.affected),
        _ => format!("Records deleted: {}\n", response.affected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fields(id: &str, name: &str, author: &str, cost: &str) -> FormFields {
        FormFields {
            id: id.into(),
            name: name.into(),
            author: author.into(),
            cost: cost.into(),
        }
    }

    #[test]
    fn test_search_request_selection() {
        let request = Command::Search(fields("3", "", "", "")).to_request().unwrap();
        assert_eq!(request.operation, OperationCode::SearchByKey);
        assert_eq!(request.key, Some(3));

        let request = Command::Search(fields("", "Dune", "", "")).to_request().unwrap();
        assert_eq!(request.operation, OperationCode::SearchByValue);
        assert_eq!(request.value.as_deref(), Some("Dune"));

        assert!(Command::Search(FormFields::default()).to_request().is_err());
    }

    #[test]
    fn test_delete_request_keeps_id_and_values_apart() {
        let request = Command::Delete(fields("5", "", "", "")).to_request().unwrap();
        assert_eq!(request.key, Some(5));
        assert_eq!(request.value, None);

        let request = Command::Delete(fields("", "5", "", "")).to_request().unwrap();
        assert_eq!(request.key, None);
        assert_eq!(request.value.as_deref(), Some("5"));
    }

    #[test]
    fn test_edit_request_defaults_key_to_id() {
        let command = Command::Edit {
            fields: fields("4", "Emma", "Austen", "8"),
            key: None,
        };
        let request = command.to_request().unwrap();
        assert_eq!(request.key, Some(4));
        assert_eq!(request.record.unwrap().id, 4);
    }

    #[test]
    fn test_run_session() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();

        let out = run(&mut store, &Command::Add(fields("1", "Dune", "Herbert", "12.5"))).unwrap();
        assert!(out.starts_with("Record added\n"));
        assert!(out.contains("Dune"));

        let err = run(&mut store, &Command::Add(fields("1", "Dune", "Herbert", "12.5"))).unwrap_err();
        assert_eq!(err.to_string(), "Key 1 already exists");

        let out = run(&mut store, &Command::Search(fields("", "", "Austen", ""))).unwrap();
        assert_eq!(out, "No records found\n");

        let out = run(&mut store, &Command::Delete(fields("1", "", "", ""))).unwrap();
        assert!(out.starts_with("Records deleted: 1\n"));
        assert!(store.is_empty());

        let err = run(&mut store, &Command::Delete(fields("", "Nobody", "", ""))).unwrap_err();
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_run_export() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();
        run(&mut store, &Command::Add(fields("1", "Dune", "Herbert", "12.5"))).unwrap();

        let path = dir.path().join("out.txt");
        let out = run(&mut store, &Command::Export { path: path.clone() }).unwrap();
        assert!(out.starts_with("Exported 2 lines"));
        assert!(path.exists());
    }
}
