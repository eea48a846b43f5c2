//! Session repository
//!
//! One JSON document per named session under `sessions/`.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::BudgetError;
use crate::session::SessionState;

use super::file_io::{read_json_required, write_json_atomic};

/// Repository for session persistence
pub struct SessionRepository {
    dir: PathBuf,
}

impl SessionRepository {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, BudgetError> {
        validate_session_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Load a session by name
    pub fn load(&self, name: &str) -> Result<SessionState, BudgetError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(BudgetError::session_not_found(name));
        }
        read_json_required(&path)
            .map_err(|e| BudgetError::Storage(format!("Failed to load session {}: {}", name, e)))
    }

    /// Save a session, creating or replacing it
    pub fn save(&self, name: &str, state: &SessionState) -> Result<(), BudgetError> {
        let path = self.path_for(name)?;
        debug!(session = name, "saving session");
        write_json_atomic(&path, state)
    }

    /// Names of all saved sessions, sorted
    pub fn list(&self) -> Result<Vec<String>, BudgetError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .map_err(|e| BudgetError::Io(format!("Failed to read sessions directory: {}", e)))?
        {
            let path = entry
                .map_err(|e| BudgetError::Io(format!("Failed to read sessions directory: {}", e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_session_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a session
    pub fn delete(&self, name: &str) -> Result<(), BudgetError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(BudgetError::session_not_found(name));
        }
        fs::remove_file(&path)
            .map_err(|e| BudgetError::Io(format!("Failed to delete session {}: {}", name, e)))
    }
}

/// Session names become file names: letters, digits, `-` and `_` only
pub fn validate_session_name(name: &str) -> Result<(), BudgetError> {
    if name.is_empty() || name.len() > 64 {
        return Err(BudgetError::Validation(
            "Session name must be 1 to 64 characters".into(),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BudgetError::Validation(format!(
            "Invalid session name '{}': use letters, digits, '-' or '_'",
            name
        )));
    }
    Ok(())
}
