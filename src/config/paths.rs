//! Path management for the budget wizard
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_WIZARD_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories::ProjectDirs`
//!    (`~/.config/budget-wizard` on Linux)

use directories::ProjectDirs;
use std::path::PathBuf;

use crate::error::BudgetError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_WIZARD_DATA_DIR";

/// Manages all paths used by the wizard
#[derive(Debug, Clone)]
pub struct WizardPaths {
    base_dir: PathBuf,
}

impl WizardPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create WizardPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON document per session
    pub fn sessions_dir(&self) -> PathBuf {
        self.base_dir.join("sessions")
    }

    /// Directory for exports written without an explicit output path
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.base_dir.join("catalog.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path of a named session document
    pub fn session_file(&self, name: &str) -> PathBuf {
        self.sessions_dir().join(format!("{}.json", name))
    }

    /// Ensure the base and sessions directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.sessions_dir()).map_err(|e| {
            BudgetError::Io(format!("Failed to create sessions directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if the wizard has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    ProjectDirs::from("", "", "budget-wizard")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BudgetError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.sessions_dir(), temp_dir.path().join("sessions"));
        assert_eq!(
            paths.session_file("q3-it"),
            temp_dir.path().join("sessions").join("q3-it.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.sessions_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.catalog_file(), temp_dir.path().join("catalog.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }
}
