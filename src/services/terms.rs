//! Terms gate
//!
//! Decides which acceptance slots a step or a submission needs and records
//! present/accept/decline transitions on the session ledger.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AcceptOutcome, BudgetSnapshot, Catalog, Department, TermsSlot, TermsStatus, WorkflowStep,
};
use crate::session::SessionState;

/// One row of the terms status view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsStatusRow {
    pub slot: TermsSlot,
    pub title: String,
    pub status: TermsStatus,
    /// Version on record, if the slot was accepted
    pub accepted_version: Option<u32>,
    pub accepted_at: Option<DateTime<Utc>>,
    /// Currently published version
    pub published_version: u32,
}

/// Service for terms acceptance
pub struct TermsService<'a> {
    catalog: &'a Catalog,
    fallback_version: u32,
}

impl<'a> TermsService<'a> {
    /// `fallback_version` is used for slots the catalog has no document for
    pub fn new(catalog: &'a Catalog, fallback_version: u32) -> Self {
        Self {
            catalog,
            fallback_version,
        }
    }

    /// Published version of a slot's terms
    pub fn published_version(&self, slot: &TermsSlot) -> u32 {
        self.catalog
            .terms_for(slot)
            .map(|t| t.version)
            .unwrap_or(self.fallback_version)
    }

    /// Slots that must be accepted before a step can be entered
    pub fn required_for_step(&self, state: &SessionState, step: WorkflowStep) -> Vec<TermsSlot> {
        let mut slots = Vec::new();
        if step > WorkflowStep::TermsSystem {
            slots.push(TermsSlot::SystemWide);
        }
        if step > WorkflowStep::TermsDepartment {
            if let Some(department) = state.selected_department {
                slots.push(TermsSlot::Department(department));
            }
        }
        slots
    }

    /// First missing acceptance for entering a step
    pub fn check_enter(&self, state: &SessionState, step: WorkflowStep) -> BudgetResult<()> {
        match self
            .required_for_step(state, step)
            .into_iter()
            .find(|slot| !state.terms_accepted.is_accepted(slot))
        {
            Some(slot) => Err(BudgetError::TermsNotAccepted { slot }),
            None => Ok(()),
        }
    }

    pub fn can_enter(&self, state: &SessionState, step: WorkflowStep) -> bool {
        self.check_enter(state, step).is_ok()
    }

    /// Slots a submission needs; high-value only above the threshold
    pub fn required_for_submit(&self, snapshot: &BudgetSnapshot) -> Vec<TermsSlot> {
        let mut slots = vec![TermsSlot::BudgetSubmission];
        if snapshot.is_high_value() {
            slots.push(TermsSlot::HighValue);
        }
        slots
    }

    pub fn check_submit(&self, state: &SessionState, snapshot: &BudgetSnapshot) -> BudgetResult<()> {
        match self
            .required_for_submit(snapshot)
            .into_iter()
            .find(|slot| !state.terms_accepted.is_accepted(slot))
        {
            Some(slot) => Err(BudgetError::TermsNotAccepted { slot }),
            None => Ok(()),
        }
    }

    /// Slots shown on a terms step
    pub fn slots_for_step(
        &self,
        state: &SessionState,
        step: WorkflowStep,
        high_value: bool,
    ) -> Vec<TermsSlot> {
        match step {
            WorkflowStep::TermsSystem => vec![TermsSlot::SystemWide],
            WorkflowStep::TermsDepartment => state
                .selected_department
                .map(TermsSlot::Department)
                .into_iter()
                .collect(),
            WorkflowStep::TermsSubmission if high_value => {
                vec![TermsSlot::BudgetSubmission, TermsSlot::HighValue]
            }
            WorkflowStep::TermsSubmission => vec![TermsSlot::BudgetSubmission],
            _ => Vec::new(),
        }
    }

    /// Present the slots of a step; returns the ones whose status changed
    pub fn present_step(
        &self,
        state: &mut SessionState,
        step: WorkflowStep,
        high_value: bool,
    ) -> Vec<TermsSlot> {
        self.slots_for_step(state, step, high_value)
            .into_iter()
            .filter(|slot| state.terms_accepted.present(*slot))
            .collect()
    }

    /// Accept a slot; without a version the published one is used
    pub fn accept(
        &self,
        state: &mut SessionState,
        slot: TermsSlot,
        version: Option<u32>,
        origin: &str,
        at: DateTime<Utc>,
    ) -> BudgetResult<AcceptOutcome> {
        let version = version.unwrap_or_else(|| self.published_version(&slot));
        let outcome = state
            .terms_accepted
            .accept(slot, version, origin, at)
            .map_err(|e| BudgetError::Validation(format!("Cannot accept {}: {}", slot, e)))?;

        debug!(slot = %slot, version, ?outcome, "terms accepted");
        Ok(outcome)
    }

    pub fn decline(&self, state: &mut SessionState, slot: TermsSlot) -> BudgetResult<()> {
        state
            .terms_accepted
            .decline(slot)
            .map_err(|e| BudgetError::Validation(format!("Cannot decline {}: {}", slot, e)))?;

        debug!(slot = %slot, "terms declined");
        Ok(())
    }

    /// Status of every slot, system-wide first
    pub fn status(&self, state: &SessionState) -> Vec<TermsStatusRow> {
        all_slots()
            .into_iter()
            .map(|slot| {
                let record = state.terms_accepted.record(&slot);
                let accepted = record.filter(|r| r.status == TermsStatus::Accepted);
                TermsStatusRow {
                    title: self
                        .catalog
                        .terms_for(&slot)
                        .map(|t| t.title.clone())
                        .unwrap_or_else(|| slot.to_string()),
                    status: state.terms_accepted.status(&slot),
                    accepted_version: accepted.map(|r| r.version),
                    accepted_at: accepted.and_then(|r| r.timestamp),
                    published_version: self.published_version(&slot),
                    slot,
                }
            })
            .collect()
    }
}

fn all_slots() -> Vec<TermsSlot> {
    let mut slots = vec![TermsSlot::SystemWide];
    slots.extend(Department::ALL.iter().copied().map(TermsSlot::Department));
    slots.push(TermsSlot::HighValue);
    slots.push(TermsSlot::BudgetSubmission);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::init::default_catalog;

    fn setup() -> (Catalog, SessionState) {
        let catalog = default_catalog();
        let state = SessionState::new(&catalog);
        (catalog, state)
    }

    #[test]
    fn test_required_for_step() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);

        assert!(terms
            .required_for_step(&state, WorkflowStep::TermsSystem)
            .is_empty());
        assert_eq!(
            terms.required_for_step(&state, WorkflowStep::DepartmentSelection),
            vec![TermsSlot::SystemWide]
        );

        state.selected_department = Some(Department::Hr);
        assert_eq!(
            terms.required_for_step(&state, WorkflowStep::Services),
            vec![TermsSlot::SystemWide, TermsSlot::Department(Department::Hr)]
        );
    }

    #[test]
    fn test_check_enter_reports_first_missing_slot() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);
        state.selected_department = Some(Department::Legal);

        let err = terms.check_enter(&state, WorkflowStep::Services).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::TermsNotAccepted { slot: TermsSlot::SystemWide }
        ));

        state.terms_accepted.present(TermsSlot::SystemWide);
        terms
            .accept(&mut state, TermsSlot::SystemWide, None, "test", Utc::now())
            .unwrap();
        let err = terms.check_enter(&state, WorkflowStep::Services).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::TermsNotAccepted {
                slot: TermsSlot::Department(Department::Legal)
            }
        ));
    }

    #[test]
    fn test_high_value_required_only_above_threshold() {
        let (catalog, _) = setup();
        let terms = TermsService::new(&catalog, 1);

        let exact = BudgetSnapshot::new(Money::from_units(100_000), Money::zero(), Money::zero());
        assert_eq!(terms.required_for_submit(&exact), vec![TermsSlot::BudgetSubmission]);

        let above = BudgetSnapshot::new(Money::from_units(100_001), Money::zero(), Money::zero());
        assert!(terms.required_for_submit(&above).contains(&TermsSlot::HighValue));
    }

    #[test]
    fn test_present_step_only_reports_changes() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);

        assert_eq!(
            terms.present_step(&mut state, WorkflowStep::TermsSubmission, true),
            vec![TermsSlot::BudgetSubmission, TermsSlot::HighValue]
        );
        assert!(terms
            .present_step(&mut state, WorkflowStep::TermsSubmission, true)
            .is_empty());
    }

    #[test]
    fn test_accept_idempotent_and_versioned() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);
        let slot = TermsSlot::HighValue;
        terms.present_step(&mut state, WorkflowStep::TermsSubmission, true);

        assert_eq!(
            terms.accept(&mut state, slot, Some(2), "test", Utc::now()).unwrap(),
            AcceptOutcome::Recorded
        );
        assert_eq!(
            terms.accept(&mut state, slot, Some(2), "test", Utc::now()).unwrap(),
            AcceptOutcome::Unchanged
        );
        assert!(terms
            .accept(&mut state, slot, Some(1), "test", Utc::now())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_decline_accepted_is_rejected() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);

        terms.decline(&mut state, TermsSlot::BudgetSubmission).unwrap();
        assert_eq!(
            state.terms_accepted.status(&TermsSlot::BudgetSubmission),
            TermsStatus::Declined
        );

        state.terms_accepted.present(TermsSlot::SystemWide);
        terms
            .accept(&mut state, TermsSlot::SystemWide, None, "test", Utc::now())
            .unwrap();
        assert!(terms
            .decline(&mut state, TermsSlot::SystemWide)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_status_lists_every_slot() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 7);
        state.terms_accepted.present(TermsSlot::SystemWide);
        terms
            .accept(&mut state, TermsSlot::SystemWide, None, "test", Utc::now())
            .unwrap();

        let rows = terms.status(&state);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].slot, TermsSlot::SystemWide);
        assert_eq!(rows[0].status, TermsStatus::Accepted);
        assert_eq!(rows[0].accepted_version, Some(1));
        assert!(rows[1..].iter().all(|r| r.accepted_version.is_none()));
    }

    #[test]
    fn test_accept_requires_presented_slot() {
        let (catalog, mut state) = setup();
        let terms = TermsService::new(&catalog, 1);

        let err = terms
            .accept(&mut state, TermsSlot::HighValue, None, "test", Utc::now())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            state.terms_accepted.status(&TermsSlot::HighValue),
            TermsStatus::NotPresented
        );

        terms.present_step(&mut state, WorkflowStep::TermsSystem, false);
        terms.decline(&mut state, TermsSlot::SystemWide).unwrap();
        assert!(terms
            .accept(&mut state, TermsSlot::SystemWide, None, "test", Utc::now())
            .unwrap_err()
            .is_validation());
    }
}
