//! Workflow controller
//!
//! Moves the wizard between steps. A move that is not allowed yet does not
//! fail: it lands on the step that has to be completed first and reports
//! why, so the caller can show the redirect.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetSnapshot, Catalog, CompanyInfo, Department, Submission, TermsSlot, WorkflowStep,
};
use crate::session::SessionState;

use super::budget::BudgetService;
use super::terms::TermsService;

/// Why a navigation landed somewhere other than requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Redirect {
    /// Company details are missing or invalid
    CompanyInfo { message: String },
    /// A terms slot must be accepted first
    TermsRequired { slot: TermsSlot },
    /// The step works on a department and none is selected
    DepartmentRequired,
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanyInfo { message } => write!(f, "{}", message),
            Self::TermsRequired { slot } => write!(f, "{} must be accepted first", slot),
            Self::DepartmentRequired => write!(f, "select a department first"),
        }
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub from: WorkflowStep,
    pub requested: WorkflowStep,
    pub landed: WorkflowStep,
    pub redirect: Option<Redirect>,
    /// Terms slots newly presented on the landing step
    pub presented: Vec<TermsSlot>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.redirect.is_some()
    }
}

/// Read-only view of where the wizard stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    pub current_step: WorkflowStep,
    pub selected_department: Option<Department>,
    pub company: String,
    /// Every step with whether it can be entered right now
    pub steps: Vec<(WorkflowStep, bool)>,
    /// Slots still needed before the current step's successors open up
    pub pending_terms: Vec<TermsSlot>,
    pub submissions: usize,
}

/// Service for wizard navigation and submission
pub struct WorkflowService<'a> {
    catalog: &'a Catalog,
    terms: TermsService<'a>,
    budget: BudgetService<'a>,
}

impl<'a> WorkflowService<'a> {
    pub fn new(catalog: &'a Catalog, fallback_terms_version: u32) -> Self {
        Self {
            catalog,
            terms: TermsService::new(catalog, fallback_terms_version),
            budget: BudgetService::new(catalog),
        }
    }

    /// Where a request for `target` would land, and why
    pub fn resolve(&self, state: &SessionState, target: WorkflowStep) -> (WorkflowStep, Option<Redirect>) {
        if target > WorkflowStep::CompanyInfo {
            if let Err(e) = state.company_info.validate(&self.catalog.companies) {
                return (
                    WorkflowStep::CompanyInfo,
                    Some(Redirect::CompanyInfo {
                        message: e.to_string(),
                    }),
                );
            }
        }

        if target > WorkflowStep::TermsSystem
            && !state.terms_accepted.is_accepted(&TermsSlot::SystemWide)
        {
            return (
                WorkflowStep::TermsSystem,
                Some(Redirect::TermsRequired {
                    slot: TermsSlot::SystemWide,
                }),
            );
        }

        if target.is_department_scoped() {
            let department = match state.selected_department {
                Some(d) => d,
                None => {
                    return (
                        WorkflowStep::DepartmentSelection,
                        Some(Redirect::DepartmentRequired),
                    )
                }
            };
            let slot = TermsSlot::Department(department);
            if target > WorkflowStep::TermsDepartment && !state.terms_accepted.is_accepted(&slot) {
                return (
                    WorkflowStep::TermsDepartment,
                    Some(Redirect::TermsRequired { slot }),
                );
            }
        }

        (target, None)
    }

    /// Whether `target` can be entered without a redirect
    pub fn can_enter(&self, state: &SessionState, target: WorkflowStep) -> bool {
        self.resolve(state, target).1.is_none()
    }

    /// Move to a step, or to the step that blocks it
    ///
    /// Backward moves are always allowed. Landing on a terms step presents
    /// its slots.
    pub fn advance(&self, state: &mut SessionState, target: WorkflowStep) -> Navigation {
        let from = state.current_step;
        let (landed, redirect) = if target <= from {
            (target, None)
        } else {
            self.resolve(state, target)
        };

        if let Some(reason) = &redirect {
            info!(requested = %target, landed = %landed, %reason, "navigation redirected");
        }

        state.current_step = landed;
        let presented = if landed.is_terms_step() {
            let high_value = self.is_high_value(state);
            self.terms.present_step(state, landed, high_value)
        } else {
            Vec::new()
        };

        Navigation {
            from,
            requested: target,
            landed,
            redirect,
            presented,
        }
    }

    /// Advance one step
    pub fn next(&self, state: &mut SessionState) -> BudgetResult<Navigation> {
        let target = state.current_step.next().ok_or_else(|| {
            BudgetError::InvalidTransition("Already at the last step; submit or start a new department".into())
        })?;
        Ok(self.advance(state, target))
    }

    /// Go back one step
    pub fn previous(&self, state: &mut SessionState) -> BudgetResult<Navigation> {
        let target = state
            .current_step
            .previous()
            .ok_or_else(|| BudgetError::InvalidTransition("Already at the first step".into()))?;
        Ok(self.advance(state, target))
    }

    /// Record validated company details
    pub fn set_company_info(&self, state: &mut SessionState, info: CompanyInfo) -> BudgetResult<()> {
        info.validate(&self.catalog.companies)
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        state.company_info = info;
        Ok(())
    }

    /// Pick the department to budget and move on to its terms
    pub fn select_department(&self, state: &mut SessionState, department: Department) -> Navigation {
        state.selected_department = Some(department);
        self.advance(state, WorkflowStep::TermsDepartment)
    }

    /// Clear the department and return to department selection
    ///
    /// Inputs already entered for other departments are kept.
    pub fn start_new_department(&self, state: &mut SessionState) -> Navigation {
        state.selected_department = None;
        self.advance(state, WorkflowStep::DepartmentSelection)
    }

    /// Submit the selected department's budget
    pub fn submit(&self, state: &mut SessionState, now: DateTime<Utc>) -> BudgetResult<Submission> {
        if state.current_step != WorkflowStep::Summary {
            return Err(BudgetError::InvalidTransition(format!(
                "Budgets can only be submitted from the summary step (current step: {})",
                state.current_step
            )));
        }

        let department = state
            .selected_department
            .ok_or_else(|| BudgetError::Validation("No department selected".into()))?;
        let snapshot = self.budget.snapshot(state, department)?;
        if snapshot.is_empty() {
            return Err(BudgetError::EmptyBudget);
        }
        self.terms.check_submit(state, &snapshot)?;

        let submission = Submission {
            reference_id: Submission::reference_id(&state.company_info.company, department, now),
            company: state.company_info.company.clone(),
            department,
            contact_person: state.company_info.contact_person.clone(),
            grand_total: snapshot.grand_total,
            submitted_at: now,
            snapshot,
        };

        info!(
            reference = %submission.reference_id,
            department = %department,
            grand_total = %snapshot.grand_total,
            "budget submitted"
        );

        state.submissions.push(submission.clone());
        Ok(submission)
    }

    pub fn state(&self, state: &SessionState) -> WorkflowState {
        let pending_terms = match state.current_step.next() {
            Some(next) => self
                .terms
                .required_for_step(state, next)
                .into_iter()
                .filter(|slot| !state.terms_accepted.is_accepted(slot))
                .collect(),
            None => Vec::new(),
        };

        WorkflowState {
            current_step: state.current_step,
            selected_department: state.selected_department,
            company: state.company_info.company.clone(),
            steps: WorkflowStep::ALL
                .iter()
                .map(|step| (*step, self.can_enter(state, *step)))
                .collect(),
            pending_terms,
            submissions: state.submissions.len(),
        }
    }

    fn current_snapshot(&self, state: &SessionState) -> Option<BudgetSnapshot> {
        self.budget.current_snapshot(state).ok()
    }

    fn is_high_value(&self, state: &SessionState) -> bool {
        self.current_snapshot(state)
            .map(|s| s.is_high_value())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::init::default_catalog;

    fn company() -> CompanyInfo {
        CompanyInfo::new("APC", "IT", "Sara Ahmed", "sara@apc.example")
    }

    fn ready_state(catalog: &Catalog) -> SessionState {
        let mut state = SessionState::new(catalog);
        state.company_info = company();
        state.terms_accepted.present(TermsSlot::SystemWide);
        state
            .terms_accepted
            .accept(TermsSlot::SystemWide, 1, "test", Utc::now())
            .unwrap();
        state
    }

    #[test]
    fn test_invalid_company_info_stays() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.advance(&mut state, WorkflowStep::TermsSystem);
        assert_eq!(nav.landed, WorkflowStep::CompanyInfo);
        assert!(matches!(nav.redirect, Some(Redirect::CompanyInfo { .. })));
    }

    #[test]
    fn test_services_without_department_redirects() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.advance(&mut state, WorkflowStep::Services);
        assert_eq!(nav.landed, WorkflowStep::DepartmentSelection);
        assert_eq!(nav.redirect, Some(Redirect::DepartmentRequired));
        assert_eq!(state.current_step, WorkflowStep::DepartmentSelection);
    }

    #[test]
    fn test_missing_system_terms_redirects_and_presents() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state.company_info = company();
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.advance(&mut state, WorkflowStep::Projects);
        assert_eq!(nav.landed, WorkflowStep::TermsSystem);
        assert_eq!(nav.presented, vec![TermsSlot::SystemWide]);
    }

    #[test]
    fn test_select_department_lands_on_department_terms() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.select_department(&mut state, Department::Legal);
        assert_eq!(nav.landed, WorkflowStep::TermsDepartment);
        assert_eq!(nav.presented, vec![TermsSlot::Department(Department::Legal)]);

        let nav = workflow.advance(&mut state, WorkflowStep::Support);
        assert_eq!(nav.landed, WorkflowStep::TermsDepartment);

        state
            .terms_accepted
            .accept(TermsSlot::Department(Department::Legal), 1, "test", Utc::now())
            .unwrap();
        let nav = workflow.advance(&mut state, WorkflowStep::Support);
        assert_eq!(nav.landed, WorkflowStep::Support);
        assert!(!nav.was_redirected());
    }

    #[test]
    fn test_backward_always_allowed() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state.current_step = WorkflowStep::Projects;
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.previous(&mut state).unwrap();
        assert_eq!(nav.landed, WorkflowStep::Support);
        let nav = workflow.advance(&mut state, WorkflowStep::CompanyInfo);
        assert_eq!(nav.landed, WorkflowStep::CompanyInfo);
        assert!(workflow.previous(&mut state).is_err());
    }

    #[test]
    fn test_set_company_info_validates() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let bad = CompanyInfo::new("Initech", "IT", "Peter", "peter@initech.example");
        assert!(workflow
            .set_company_info(&mut state, bad)
            .unwrap_err()
            .is_validation());
        workflow.set_company_info(&mut state, company()).unwrap();
        assert_eq!(state.company_info.company, "APC");
    }

    #[test]
    fn test_start_new_department_keeps_inputs() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        state.selected_department = Some(Department::Hr);
        state.current_step = WorkflowStep::Summary;
        state
            .support_packages
            .insert(Department::Hr, "Basic".to_string());
        let workflow = WorkflowService::new(&catalog, 1);

        let nav = workflow.start_new_department(&mut state);
        assert_eq!(nav.landed, WorkflowStep::DepartmentSelection);
        assert!(state.selected_department.is_none());
        assert_eq!(state.support_package(Department::Hr), Some("Basic"));
    }

    #[test]
    fn test_submit_outside_summary_is_invalid() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let err = workflow.submit(&mut state, Utc::now()).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidTransition(_)));
    }

    #[test]
    fn test_submit_empty_budget_warns() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        state.selected_department = Some(Department::Hr);
        state.current_step = WorkflowStep::Summary;
        let workflow = WorkflowService::new(&catalog, 1);

        let err = workflow.submit(&mut state, Utc::now()).unwrap_err();
        assert!(err.is_warning());
        assert!(state.submissions.is_empty());
    }

    #[test]
    fn test_submit_records_reference() {
        let catalog = default_catalog();
        let mut state = ready_state(&catalog);
        state.selected_department = Some(Department::Hr);
        state.current_step = WorkflowStep::Summary;
        state
            .support_packages
            .insert(Department::Hr, "Basic".to_string());
        let workflow = WorkflowService::new(&catalog, 1);

        let err = workflow.submit(&mut state, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::TermsNotAccepted { slot: TermsSlot::BudgetSubmission }
        ));

        state.terms_accepted.present(TermsSlot::BudgetSubmission);
        state
            .terms_accepted
            .accept(TermsSlot::BudgetSubmission, 1, "test", Utc::now())
            .unwrap();
        let submission = workflow.submit(&mut state, Utc::now()).unwrap();
        assert!(submission.reference_id.starts_with("APC-HR-2025-"));
        assert_eq!(submission.grand_total, Money::from_units(52_000));
        assert_eq!(state.submissions.len(), 1);
    }

    #[test]
    fn test_workflow_state_view() {
        let catalog = default_catalog();
        let state = ready_state(&catalog);
        let workflow = WorkflowService::new(&catalog, 1);

        let view = workflow.state(&state);
        assert_eq!(view.current_step, WorkflowStep::CompanyInfo);
        assert_eq!(view.company, "APC");
        assert!(view.steps.iter().any(|(s, ok)| *s == WorkflowStep::DepartmentSelection && *ok));
        assert!(view.steps.iter().any(|(s, ok)| *s == WorkflowStep::Services && !*ok));
    }
}
