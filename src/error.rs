//! Error type shared by the library
//!
//! Domain refusals (contract floor, missing terms, empty budget) are their
//! own variants so callers can match on them; I/O and parse failures carry
//! the underlying message.

use thiserror::Error;

use crate::models::TermsSlot;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    /// Missing or malformed form input
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// License reduction below the contractual floor
    #[error("Contract constraint on '{service}': requested {requested} licenses, minimum allowed is {floor}")]
    ContractConstraint {
        service: String,
        requested: u32,
        floor: u32,
    },

    /// A workflow step or action needs terms that have not been accepted
    #[error("Terms not accepted: {slot}")]
    TermsNotAccepted { slot: TermsSlot },

    /// Submission attempted with nothing budgeted
    #[error("Budget is empty: select services, a support package or projects before submitting")]
    EmptyBudget,

    /// Action not available from the current workflow step
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Unreadable or unwritable data files
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl BudgetError {
    pub fn department_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Department",
            identifier: identifier.into(),
        }
    }

    pub fn service_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Service",
            identifier: identifier.into(),
        }
    }

    pub fn package_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Support package",
            identifier: identifier.into(),
        }
    }

    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    pub fn custom_service_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Custom service",
            identifier: identifier.into(),
        }
    }

    pub fn session_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Session",
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Warnings block an action but are not failures of the system
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyBudget)
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for BudgetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::service_not_found("oracle_erp");
        assert_eq!(err.to_string(), "Service not found: oracle_erp");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_contract_constraint_error() {
        let err = BudgetError::ContractConstraint {
            service: "Microsoft 365 E3".into(),
            requested: 100,
            floor: 150,
        };
        assert_eq!(
            err.to_string(),
            "Contract constraint on 'Microsoft 365 E3': requested 100 licenses, minimum allowed is 150"
        );
    }

    #[test]
    fn test_terms_not_accepted_error() {
        let err = BudgetError::TermsNotAccepted {
            slot: TermsSlot::Department(Department::Legal),
        };
        assert_eq!(err.to_string(), "Terms not accepted: department terms (Legal)");
    }

    #[test]
    fn test_empty_budget_is_warning() {
        assert!(BudgetError::EmptyBudget.is_warning());
        assert!(!BudgetError::Validation("x".into()).is_warning());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }
}
