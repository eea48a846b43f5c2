//! Domain events
//!
//! Applying a command returns the events it caused. Front ends render them;
//! nothing in the library reacts to them.

use serde::Serialize;
use std::fmt;

use crate::models::{BudgetSnapshot, Department, Money, TermsSlot, WorkflowStep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    CompanyInfoUpdated {
        company: String,
    },
    DepartmentSelected {
        department: Department,
    },
    StepChanged {
        from: WorkflowStep,
        to: WorkflowStep,
    },
    /// A navigation landed short of its target
    Redirected {
        requested: WorkflowStep,
        landed: WorkflowStep,
        reason: String,
    },
    /// A slot was presented and waits for acceptance
    TermsRequired {
        slot: TermsSlot,
    },
    TermsAccepted {
        slot: TermsSlot,
        version: u32,
    },
    /// Blocks progress until the slot is presented again and accepted
    TermsDeclined {
        slot: TermsSlot,
    },
    BudgetChanged {
        department: Department,
        snapshot: BudgetSnapshot,
    },
    /// The budget crossed the high-value threshold
    HighValueTermsRequired {
        department: Department,
        grand_total: Money,
    },
    LicenseClamped {
        department: Department,
        service: String,
        requested: u32,
        applied: u32,
    },
    Submitted {
        reference_id: String,
        department: Department,
        grand_total: Money,
    },
}

impl DomainEvent {
    /// Events the user must act on before continuing
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::TermsDeclined { .. } | Self::Redirected { .. } | Self::HighValueTermsRequired { .. }
        )
    }
}

impl fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanyInfoUpdated { company } => write!(f, "Company information saved for {}", company),
            Self::DepartmentSelected { department } => {
                write!(f, "Department selected: {}", department.title())
            }
            Self::StepChanged { from, to } => write!(f, "Step: {} -> {}", from.title(), to.title()),
            Self::Redirected {
                requested,
                landed,
                reason,
            } => write!(
                f,
                "Cannot open {} yet ({}); moved to {}",
                requested.title(),
                reason,
                landed.title()
            ),
            Self::TermsRequired { slot } => write!(f, "Please review and accept the {}", slot),
            Self::TermsAccepted { slot, version } => {
                write!(f, "Accepted {} (version {})", slot, version)
            }
            Self::TermsDeclined { slot } => write!(
                f,
                "Declined {}; accept them to continue",
                slot
            ),
            Self::BudgetChanged {
                department,
                snapshot,
            } => write!(f, "{} budget: {}", department, snapshot.grand_total),
            Self::HighValueTermsRequired {
                department,
                grand_total,
            } => write!(
                f,
                "{} budget of {} exceeds 100,000: high-value terms must be accepted before submission",
                department, grand_total
            ),
            Self::LicenseClamped {
                service,
                requested,
                applied,
                ..
            } => write!(
                f,
                "{}: {} licenses requested, contract floor applied ({})",
                service, requested, applied
            ),
            Self::Submitted {
                reference_id,
                grand_total,
                ..
            } => write!(f, "Budget submitted: {} ({})", reference_id, grand_total),
        }
    }
}
