//! Storage layer for the budget wizard
//!
//! JSON file storage with atomic writes: the catalog, one document per
//! session, and the append-only audit log.

pub mod catalog;
pub mod file_io;
pub mod init;
pub mod sessions;

pub use catalog::{load_catalog_file, CatalogRepository};
pub use file_io::{read_json_required, write_json_atomic};
pub use init::{default_catalog, initialize_storage};
pub use sessions::{validate_session_name, SessionRepository};

use tracing::warn;

use crate::audit::{summarize_changes, AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::paths::WizardPaths;
use crate::error::BudgetError;
use crate::models::Catalog;
use crate::session::{Command, SessionState};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: WizardPaths,
    pub catalog: CatalogRepository,
    pub sessions: SessionRepository,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: WizardPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            sessions: SessionRepository::new(paths.sessions_dir()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &WizardPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_catalog(&self) -> Result<Catalog, BudgetError> {
        self.catalog.load()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record an applied command against a session
    ///
    /// Department commands log that department's inputs before and after;
    /// everything else logs the workflow part of the session.
    pub fn log_command(
        &self,
        session: &str,
        command: &Command,
        before: &SessionState,
        after: &SessionState,
    ) -> Result<(), BudgetError> {
        if !self.audit_enabled {
            return Ok(());
        }

        let (before_value, after_value) = match command.department() {
            Some(department) if command.changes_budget() => (
                before.department_slice(department),
                after.department_slice(department),
            ),
            _ => (before.workflow_slice(), after.workflow_slice()),
        };
        let diff = summarize_changes(&before_value, &after_value);

        let entry = AuditEntry::change(
            command.operation(),
            command.entity_type(),
            command.entity_id(),
            Some(command.describe()),
            before_value,
            after_value,
            diff,
        )
        .in_session(session);
        self.audit.log(&entry)
    }

    /// Record a session being created or deleted
    pub fn log_session(
        &self,
        session: &str,
        operation: Operation,
        state: &SessionState,
    ) -> Result<(), BudgetError> {
        if !self.audit_enabled {
            return Ok(());
        }

        let entry = match operation {
            Operation::Delete => {
                AuditEntry::delete(EntityType::Session, session, None, &state.workflow_slice())
            }
            _ => AuditEntry::create(EntityType::Session, session, None, &state.workflow_slice()),
        }
        .in_session(session);
        self.audit.log(&entry)
    }

    /// Record a catalog edit
    pub fn log_catalog_change(
        &self,
        operation: Operation,
        entity_id: &str,
        description: &str,
        before: &Catalog,
        after: &Catalog,
    ) -> Result<(), BudgetError> {
        if !self.audit_enabled {
            return Ok(());
        }

        let before_value = serde_json::to_value(before)?;
        let after_value = serde_json::to_value(after)?;
        let diff = summarize_changes(&before_value, &after_value);
        let entry = AuditEntry::change(
            operation,
            EntityType::Catalog,
            entity_id,
            Some(description.to_string()),
            before_value,
            after_value,
            diff,
        );
        self.audit.log(&entry)
    }

    /// Save a session after a command and audit it
    ///
    /// The session is saved first; a failed audit write is logged and
    /// does not undo the save.
    pub fn commit(
        &self,
        session: &str,
        command: &Command,
        before: &SessionState,
        after: &SessionState,
    ) -> Result<(), BudgetError> {
        self.sessions.save(session, after)?;
        if let Err(e) = self.log_command(session, command, before, after) {
            warn!(session, error = %e, "failed to write audit entry");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, WorkflowStep};
    use tempfile::TempDir;

    fn storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = storage();

        assert!(temp_dir.path().join("sessions").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.load_catalog().unwrap(), default_catalog());
    }

    #[test]
    fn test_commit_saves_and_audits() {
        let (_temp_dir, storage) = storage();
        let before = SessionState::new(&default_catalog());
        let mut after = before.clone();
        after
            .support_packages
            .insert(Department::Hr, "Basic".to_string());

        let command = Command::SelectSupportPackage {
            department: Department::Hr,
            package: "Basic".into(),
        };
        storage.commit("hr", &command, &before, &after).unwrap();

        assert_eq!(storage.sessions.load("hr").unwrap(), after);
        let entries = storage.audit().read_session("hr").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::SupportPackage);
        assert_eq!(entries[0].entity_id, "HR");
        assert!(entries[0].diff_summary.is_some());
    }

    #[test]
    fn test_workflow_commands_log_workflow_slice() {
        let (_temp_dir, storage) = storage();
        let before = SessionState::default();
        let mut after = before.clone();
        after.current_step = WorkflowStep::TermsSystem;

        let command = Command::AdvanceStep {
            target: WorkflowStep::TermsSystem,
        };
        storage.log_command("s1", &command, &before, &after).unwrap();

        let entries = storage.audit().read_all().unwrap();
        let logged = entries[0].after.as_ref().unwrap();
        assert_eq!(logged["currentStep"], "terms_system");
    }

    #[test]
    fn test_audit_disabled() {
        let (_temp_dir, storage) = storage();
        let storage = storage.with_audit(false);
        let state = SessionState::default();

        storage
            .commit("quiet", &Command::NextStep, &state, &state)
            .unwrap();
        assert!(!storage.audit().exists());
        assert!(storage.sessions.exists("quiet"));
    }
}
