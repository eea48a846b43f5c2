//! Wizard steps
//!
//! The wizard is a fixed linear sequence. Which steps are reachable is
//! decided by `WorkflowService`; this module only knows the order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::terms::TermsSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    #[default]
    CompanyInfo,
    TermsSystem,
    DepartmentSelection,
    TermsDepartment,
    Services,
    Support,
    Projects,
    TermsSubmission,
    Summary,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 9] = [
        WorkflowStep::CompanyInfo,
        WorkflowStep::TermsSystem,
        WorkflowStep::DepartmentSelection,
        WorkflowStep::TermsDepartment,
        WorkflowStep::Services,
        WorkflowStep::Support,
        WorkflowStep::Projects,
        WorkflowStep::TermsSubmission,
        WorkflowStep::Summary,
    ];

    /// Zero-based position in the wizard
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Steps that operate on the selected department
    pub fn is_department_scoped(&self) -> bool {
        *self >= Self::TermsDepartment
    }

    /// Whether the step exists to present terms
    pub fn is_terms_step(&self) -> bool {
        matches!(
            self,
            Self::TermsSystem | Self::TermsDepartment | Self::TermsSubmission
        )
    }

    /// The step on which a slot is presented and accepted
    pub fn owning(slot: &TermsSlot) -> Self {
        match slot {
            TermsSlot::SystemWide => Self::TermsSystem,
            TermsSlot::Department(_) => Self::TermsDepartment,
            TermsSlot::HighValue | TermsSlot::BudgetSubmission => Self::TermsSubmission,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::CompanyInfo => "company_info",
            Self::TermsSystem => "terms_system",
            Self::DepartmentSelection => "department_selection",
            Self::TermsDepartment => "terms_department",
            Self::Services => "services",
            Self::Support => "support",
            Self::Projects => "projects",
            Self::TermsSubmission => "terms_submission",
            Self::Summary => "summary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CompanyInfo => "Company Information",
            Self::TermsSystem => "System Terms & Conditions",
            Self::DepartmentSelection => "Department Selection",
            Self::TermsDepartment => "Department Terms",
            Self::Services => "Operational Services",
            Self::Support => "Support Package",
            Self::Projects => "Implementation Projects",
            Self::TermsSubmission => "Submission Terms",
            Self::Summary => "Budget Summary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.iter().copied().find(|step| step.key() == normalized)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
