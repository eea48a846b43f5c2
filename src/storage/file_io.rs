//! File I/O utilities with atomic writes
//!
//! Writes go to a sibling temp file which is synced and then renamed over
//! the target, so a crash leaves either the old or the new document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BudgetError;

/// Read a JSON document; a missing file is a storage error
pub fn read_json_required<T, P>(path: P) -> Result<T, BudgetError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(BudgetError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| BudgetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a YAML document
pub fn read_yaml_required<T, P>(path: P) -> Result<T, BudgetError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = fs::read_to_string(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&contents)
        .map_err(|e| BudgetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BudgetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| BudgetError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write YAML to a file atomically
pub fn write_yaml_atomic<T, P>(path: P, data: &T) -> Result<(), BudgetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_yaml::to_writer(writer, data)
            .map_err(|e| BudgetError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

fn write_atomic<F>(path: &Path, write_body: F) -> Result<(), BudgetError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), BudgetError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BudgetError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| BudgetError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = write_body(&mut writer)
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| BudgetError::Storage(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| BudgetError::Storage(format!("Failed to sync data: {}", e)))
        });

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BudgetError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Draft {
        company: String,
        total: i64,
    }

    fn draft() -> Draft {
        Draft {
            company: "APC".to_string(),
            total: 265_655,
        }
    }

    #[test]
    fn test_write_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draft.json");

        write_json_atomic(&path, &draft()).unwrap();
        let loaded: Draft = read_json_required(&path).unwrap();
        assert_eq!(loaded, draft());
        assert!(!temp_dir.path().join("draft.json.tmp").exists());
    }

    #[test]
    fn test_write_and_read_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draft.yaml");

        write_yaml_atomic(&path, &draft()).unwrap();
        let loaded: Draft = read_yaml_required(&path).unwrap();
        assert_eq!(loaded, draft());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("draft.json");

        write_json_atomic(&path, &draft()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_json_required_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_json_required::<Draft, _>(temp_dir.path().join("x.json")).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(read_json_required::<Draft, _>(&path).is_err());
    }
}
