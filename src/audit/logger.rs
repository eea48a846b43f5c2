//! Append-only audit log
//!
//! One JSON object per line. Writes append and flush; reads parse the
//! whole file and fail on the first line that is not a valid entry.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{BudgetError, BudgetResult};

use super::entry::AuditEntry;

/// Reads and appends entries of one audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

fn io_error(action: &'static str) -> impl FnOnce(io::Error) -> BudgetError {
    move |e| BudgetError::Io(format!("Failed to {} audit log: {}", action, e))
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> BudgetResult<()> {
        self.append(std::slice::from_ref(entry))
    }

    /// Append entries in order with a single flush
    pub fn append(&self, entries: &[AuditEntry]) -> BudgetResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                BudgetError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            lines.push_str(&json);
            lines.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(io_error("open"))?;
        file.write_all(lines.as_bytes()).map_err(io_error("write"))?;
        file.flush().map_err(io_error("flush"))
    }

    /// Entries matching `keep`, oldest first
    pub fn read_where<F>(&self, mut keep: F) -> BudgetResult<Vec<AuditEntry>>
    where
        F: FnMut(&AuditEntry) -> bool,
    {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.log_path).map_err(io_error("open"))?);
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(io_error("read"))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                BudgetError::Json(format!("Bad audit entry at line {}: {}", index + 1, e))
            })?;
            if keep(&entry) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    pub fn read_all(&self) -> BudgetResult<Vec<AuditEntry>> {
        self.read_where(|_| true)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> BudgetResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Entries recorded for one session, oldest first
    pub fn read_session(&self, session: &str) -> BudgetResult<Vec<AuditEntry>> {
        self.read_where(|e| e.session == session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, TempDir) {
        let temp = TempDir::new().unwrap();
        (AuditLogger::new(temp.path().join("audit.log")), temp)
    }

    fn selection(session: &str, key: &str) -> AuditEntry {
        AuditEntry::create(
            EntityType::ServiceSelection,
            format!("IT/{}", key),
            Some(format!("select {}", key)),
            &json!({"service_key": key, "requested_quantity": 10}),
        )
        .in_session(session)
    }

    #[test]
    fn test_log_and_read_back() {
        let (log, _temp) = logger();
        log.log(&selection("plan", "power_bi_premium")).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::ServiceSelection);
        assert_eq!(entries[0].session, "plan");
    }

    #[test]
    fn test_append_keeps_order() {
        let (log, _temp) = logger();
        let batch: Vec<_> = (0..3).map(|i| selection("plan", &format!("s{}", i))).collect();
        log.append(&batch).unwrap();
        log.append(&[]).unwrap();

        let ids: Vec<_> = log
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["IT/s0", "IT/s1", "IT/s2"]);
    }

    #[test]
    fn test_read_recent() {
        let (log, _temp) = logger();
        for i in 0..10 {
            log.log(&selection("plan", &format!("s{}", i))).unwrap();
        }

        let recent = log.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].entity_id, "IT/s7");
        assert_eq!(recent[2].entity_id, "IT/s9");
        assert_eq!(log.read_recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_read_session() {
        let (log, _temp) = logger();
        log.log(&selection("a", "x")).unwrap();
        log.log(&selection("b", "y")).unwrap();
        log.log(&selection("a", "z")).unwrap();

        let entries = log.read_session("a").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.session == "a"));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (log, _temp) = logger();
        assert!(!log.exists());
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_line_is_an_error() {
        let (log, _temp) = logger();
        std::fs::write(log.path(), "{not json}\n").unwrap();
        assert!(matches!(log.read_all(), Err(BudgetError::Json(_))));
    }
}
