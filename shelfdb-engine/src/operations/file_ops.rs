//! File operations: Backup, Restore, Export

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::storage::sheet::Sheet;

use super::dispatcher::RecordStore;

/// Copy the backing file byte for byte to `dest`.
///
/// `dest` may not be the backing file itself: the copy truncates its
/// target before reading the source.
pub fn backup(store: &RecordStore, dest: &Path) -> StoreResult<()> {
    if is_same_file(&store.path, dest)? {
        return Err(StoreError::InvalidOperation(format!(
            "backup target {} is the store file itself",
            dest.display()
        )));
    }

    let bytes = fs::copy(&store.path, dest)?;
    info!("Backed up {} to {} ({} bytes)", store.path.display(), dest.display(), bytes);
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> StoreResult<bool> {
    if !b.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// Replace the backing file with the workbook at `src` and rebuild the
/// index. The backup must itself be a valid store file.
pub fn restore(store: &mut RecordStore, src: &Path) -> StoreResult<()> {
    if !src.exists() {
        return Err(StoreError::BackupNotFound(src.to_path_buf()));
    }

    let sheet = Sheet::load(src)?;
    store.save_sheet(&sheet)?;
    store.rebuild_index()?;

    info!("Restored {} from {} ({} records)", store.path.display(), src.display(), store.len());
    Ok(())
}

/// Write every row, header included, as tab-separated UTF-8 text.
/// Short rows are padded with empty fields to the header width.
/// Returns the number of lines written.
pub fn export_to_text(store: &RecordStore, dest: &Path) -> StoreResult<usize> {
    let sheet = store.load_sheet()?;
    let width = sheet.header().len();
    let mut writer = BufWriter::new(File::create(dest)?);

    let mut lines = 0;
    for row in sheet.rows() {
        let mut line: Vec<String> = row.iter().map(ToString::to_string).collect();
        if line.len() < width {
            line.resize(width, String::new());
        }
        writeln!(writer, "{}", line.join("\t"))?;
        lines += 1;
    }
    writer.flush()?;

    info!("Exported {} lines to {}", lines, dest.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::{Cell, Record};
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("db.xlsx")).unwrap();
        store.add(Record::new(1, "Dune", "Herbert", 12.5)).unwrap();
        store.add(Record::new(2, "Emma", "Austen", 8.0)).unwrap();
        (dir, store)
    }

    #[test]
    fn test_export_one_line_per_row_plus_header() {
        let (dir, store) = store();
        let dest = dir.path().join("books.txt");

        assert_eq!(export_to_text(&store, &dest).unwrap(), 3);

        let text = fs::read_to_string(&dest).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["ID\tName\tAuthor\tCost", "1\tDune\tHerbert\t12.5", "2\tEmma\tAusten\t8.0"]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_export_keeps_non_ascii_text() {
        let (dir, mut store) = store();
        store.add(Record::new(3, "Мастер и Маргарита", "Булгаков", 10.0)).unwrap();
        let dest = dir.path().join("books.txt");

        export_to_text(&store, &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert!(text.contains("3\tМастер и Маргарита\tБулгаков\t10.0"));
    }

    #[test]
    fn test_export_pads_short_rows() {
        let (dir, store) = store();
        let mut sheet = store.load_sheet().unwrap();
        sheet.append(vec![Cell::Int(3), Cell::from("Untitled"), Cell::from("Anon")]);
        store.save_sheet(&sheet).unwrap();

        let dest = dir.path().join("books.txt");
        export_to_text(&store, &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(last, "3\tUntitled\tAnon\t");
        assert_eq!(last.split('\t').count(), 4);
    }

    #[test]
    fn test_backup_then_restore_reproduces_records() {
        let (dir, mut store) = store();
        let backup_path = dir.path().join("backup.xlsx");
        let original = store.records().unwrap();

        backup(&store, &backup_path).unwrap();

        store.add(Record::new(3, "Persuasion", "Austen", 9.0)).unwrap();
        store.delete_by_key(1).unwrap();
        assert_ne!(store.records().unwrap(), original);

        restore(&mut store, &backup_path).unwrap();
        assert_eq!(store.records().unwrap(), original);
        assert_eq!(store.len(), 2);
        assert_eq!(store.index.get(1), Some(2));
        assert!(!store.contains_key(3));
    }

    #[test]
    fn test_backup_overwrites_existing_destination() {
        let (dir, store) = store();
        let dest = dir.path().join("backup.xlsx");
        fs::write(&dest, b"stale").unwrap();

        backup(&store, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), fs::read(store.path()).unwrap());
    }

    #[test]
    fn test_backup_onto_store_file_is_refused() {
        let (dir, store) = store();
        let before = fs::read(store.path()).unwrap();

        let result = backup(&store, store.path());
        assert!(matches!(result, Err(StoreError::InvalidOperation(_))));

        // same file reached through a different spelling
        let dotted = dir.path().join(".").join("db.xlsx");
        assert!(backup(&store, &dotted).is_err());

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.records().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_missing_backup() {
        let (dir, mut store) = store();
        let result = restore(&mut store, &dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(StoreError::BackupNotFound(_))));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_restore_rejects_non_store_file() {
        let (dir, mut store) = store();
        let bogus = dir.path().join("bogus.xlsx");
        fs::write(&bogus, b"not a workbook").unwrap();

        assert!(restore(&mut store, &bogus).is_err());
        assert_eq!(store.records().unwrap().len(), 2);
    }
}
