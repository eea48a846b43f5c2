//! Command application
//!
//! `Wizard` is the single entry point for changing a session. Each command
//! runs against a copy of the state; the copy is returned only when the
//! command succeeds, so a failed command leaves the caller's state as it
//! was.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::models::{BudgetSnapshot, Catalog, CustomServiceEntry, Department, TermsSlot};
use crate::reports::{BudgetSummaryReport, CashFlowProjection};
use crate::services::{
    BudgetService, Navigation, SelectionService, TermsService, TermsStatusRow, WorkflowService,
    WorkflowState,
};

use super::command::Command;
use super::event::DomainEvent;
use super::state::SessionState;

/// Origin marker stamped on terms accepted through the wizard
pub const ORIGIN_MARKER: &str = "budget-wizard";

/// New state and the events produced by applying commands
#[derive(Debug, Clone)]
pub struct Applied {
    pub state: SessionState,
    pub events: Vec<DomainEvent>,
}

/// Applies commands and answers queries for sessions of one catalog
pub struct Wizard<'a> {
    catalog: &'a Catalog,
    settings: &'a Settings,
}

impl<'a> Wizard<'a> {
    pub fn new(catalog: &'a Catalog, settings: &'a Settings) -> Self {
        Self { catalog, settings }
    }

    /// A fresh session for this catalog
    pub fn new_session(&self) -> SessionState {
        SessionState::new(self.catalog)
    }

    fn selection(&self) -> SelectionService<'a> {
        SelectionService::new(self.catalog, self.settings.license_reduction_policy)
    }

    fn terms(&self) -> TermsService<'a> {
        TermsService::new(self.catalog, self.settings.terms_version)
    }

    fn workflow(&self) -> WorkflowService<'a> {
        WorkflowService::new(self.catalog, self.settings.terms_version)
    }

    fn budget(&self) -> BudgetService<'a> {
        BudgetService::new(self.catalog)
    }

    /// Apply one command
    pub fn apply(&self, state: &SessionState, command: &Command) -> BudgetResult<Applied> {
        self.apply_at(state, command, Utc::now())
    }

    /// Apply one command with an explicit clock
    pub fn apply_at(
        &self,
        state: &SessionState,
        command: &Command,
        now: DateTime<Utc>,
    ) -> BudgetResult<Applied> {
        let mut next = state.clone();
        let mut events = Vec::new();

        debug!(command = %command.describe(), "applying command");
        self.execute(&mut next, command, now, &mut events)?;

        if command.changes_budget() {
            if let Some(department) = command.department() {
                self.budget_events(state, &next, department, &mut events);
            }
        }

        Ok(Applied {
            state: next,
            events,
        })
    }

    /// Apply commands in order; if any fails none of them is applied
    pub fn apply_all(&self, state: &SessionState, commands: &[Command]) -> BudgetResult<Applied> {
        let mut applied = Applied {
            state: state.clone(),
            events: Vec::new(),
        };
        for command in commands {
            let step = self.apply(&applied.state, command)?;
            applied.state = step.state;
            applied.events.extend(step.events);
        }
        Ok(applied)
    }

    fn execute(
        &self,
        state: &mut SessionState,
        command: &Command,
        now: DateTime<Utc>,
        events: &mut Vec<DomainEvent>,
    ) -> BudgetResult<()> {
        let selection = self.selection();
        let workflow = self.workflow();

        match command {
            Command::SetCompanyInfo { info } => {
                workflow.set_company_info(state, info.clone())?;
                events.push(DomainEvent::CompanyInfoUpdated {
                    company: info.company.clone(),
                });
            }
            Command::SelectDepartment { department } => {
                let nav = workflow.select_department(state, *department);
                events.push(DomainEvent::DepartmentSelected {
                    department: *department,
                });
                navigation_events(&nav, events);
            }
            Command::AdvanceStep { target } => {
                let nav = workflow.advance(state, *target);
                navigation_events(&nav, events);
            }
            Command::NextStep => {
                let nav = workflow.next(state)?;
                navigation_events(&nav, events);
            }
            Command::PreviousStep => {
                let nav = workflow.previous(state)?;
                navigation_events(&nav, events);
            }
            Command::StartNewDepartment => {
                let nav = workflow.start_new_department(state);
                navigation_events(&nav, events);
            }
            Command::AcceptTerms {
                slot,
                department,
                version,
            } => {
                let slot = slot.slot(*department, state.selected_department)?;
                let terms = self.terms();
                terms.accept(state, slot, *version, ORIGIN_MARKER, now)?;
                let recorded = state
                    .terms_accepted
                    .record(&slot)
                    .map(|r| r.version)
                    .unwrap_or_else(|| terms.published_version(&slot));
                events.push(DomainEvent::TermsAccepted {
                    slot,
                    version: recorded,
                });
            }
            Command::DeclineTerms { slot, department } => {
                let slot = slot.slot(*department, state.selected_department)?;
                self.terms().decline(state, slot)?;
                events.push(DomainEvent::TermsDeclined { slot });
            }
            Command::SelectService {
                department,
                service,
                quantity,
                is_new,
            } => {
                let outcome =
                    selection.select_service(state, *department, service, *quantity, *is_new)?;
                if outcome.cost.was_clamped() {
                    events.push(DomainEvent::LicenseClamped {
                        department: *department,
                        service: service.clone(),
                        requested: outcome.cost.requested,
                        applied: outcome.cost.effective,
                    });
                }
            }
            Command::DeselectService {
                department,
                service,
            } => {
                selection.deselect_service(state, *department, service)?;
            }
            Command::AddCustomService {
                department,
                name,
                description,
                recurring_cost,
                setup_cost,
            } => {
                let entry = CustomServiceEntry::new(
                    name.trim(),
                    description.trim(),
                    *recurring_cost,
                    *setup_cost,
                );
                selection.add_custom_service(state, *department, entry)?;
            }
            Command::RemoveCustomService { department, index } => {
                selection.remove_custom_service(state, *department, *index)?;
            }
            Command::SelectSupportPackage {
                department,
                package,
            } => {
                selection.select_support_package(state, *department, package)?;
            }
            Command::ClearSupportPackage { department } => {
                selection.clear_support_package(state, *department);
            }
            Command::SetSupportExtras { department, extras } => {
                selection.set_support_extras(state, *department, *extras);
            }
            Command::AddProject {
                department,
                project,
            } => {
                selection.add_project(state, *department, project.clone().into_project())?;
            }
            Command::UpdateProject {
                department,
                index,
                patch,
            } => {
                selection.update_project(state, *department, *index, patch)?;
            }
            Command::RemoveProject { department, index } => {
                selection.remove_project(state, *department, *index)?;
            }
            Command::Submit => {
                let submission = workflow.submit(state, now)?;
                events.push(DomainEvent::Submitted {
                    reference_id: submission.reference_id,
                    department: submission.department,
                    grand_total: submission.grand_total,
                });
            }
        }

        Ok(())
    }

    fn budget_events(
        &self,
        before: &SessionState,
        after: &SessionState,
        department: Department,
        events: &mut Vec<DomainEvent>,
    ) {
        let budget = self.budget();
        let previous = budget.snapshot(before, department).ok();
        let current = match budget.snapshot(after, department) {
            Ok(snapshot) => snapshot,
            Err(_) => return,
        };

        if previous == Some(current) {
            return;
        }
        events.push(DomainEvent::BudgetChanged {
            department,
            snapshot: current,
        });

        let was_high_value = previous.map(|s| s.is_high_value()).unwrap_or(false);
        if current.is_high_value()
            && !was_high_value
            && !after.terms_accepted.is_accepted(&TermsSlot::HighValue)
        {
            info!(
                department = %department,
                grand_total = %current.grand_total,
                "budget crossed the high-value threshold"
            );
            events.push(DomainEvent::HighValueTermsRequired {
                department,
                grand_total: current.grand_total,
            });
        }
    }

    pub fn budget_snapshot(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<BudgetSnapshot> {
        self.budget().snapshot(state, department)
    }

    pub fn cash_flow_projection(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<CashFlowProjection> {
        CashFlowProjection::generate(self.catalog, state, department)
    }

    pub fn workflow_state(&self, state: &SessionState) -> WorkflowState {
        self.workflow().state(state)
    }

    pub fn terms_status(&self, state: &SessionState) -> Vec<TermsStatusRow> {
        self.terms().status(state)
    }

    pub fn total_across_departments(&self, state: &SessionState) -> BudgetResult<BudgetSnapshot> {
        self.budget().total_across_departments(state)
    }

    pub fn summary(
        &self,
        state: &SessionState,
        department: Option<Department>,
    ) -> BudgetResult<BudgetSummaryReport> {
        BudgetSummaryReport::generate(self.catalog, state, department)
    }
}

fn navigation_events(nav: &Navigation, events: &mut Vec<DomainEvent>) {
    if let Some(reason) = &nav.redirect {
        events.push(DomainEvent::Redirected {
            requested: nav.requested,
            landed: nav.landed,
            reason: reason.to_string(),
        });
    }
    if nav.from != nav.landed {
        events.push(DomainEvent::StepChanged {
            from: nav.from,
            to: nav.landed,
        });
    }
    events.extend(
        nav.presented
            .iter()
            .map(|slot| DomainEvent::TermsRequired { slot: *slot }),
    );
}
