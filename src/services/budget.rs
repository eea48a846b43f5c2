//! Budget calculator
//!
//! Pure functions of session selections and the catalog. Nothing here
//! mutates state or touches disk; totals are recomputed on every call.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetSnapshot, Catalog, Department, Money, SupportPackage};
use crate::session::SessionState;

/// Service for budget calculation
pub struct BudgetService<'a> {
    catalog: &'a Catalog,
}

impl<'a> BudgetService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Selected catalog services plus custom services
    ///
    /// Unselected entries contribute nothing whatever cost they carry. A
    /// selection whose service is missing from the catalog is an error.
    pub fn operational_total(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<Money> {
        let mut total = Money::zero();

        for selection in state.selections(department).filter(|s| s.selected) {
            self.catalog.service(department, &selection.service_key)?;
            total += selection.billable_cost();
        }

        total += state
            .custom_services(department)
            .iter()
            .map(|c| c.annual_cost)
            .sum::<Money>();

        Ok(total)
    }

    /// The selected package, if any, resolved against the catalog
    pub fn selected_package(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<Option<&'a SupportPackage>> {
        state
            .support_package(department)
            .map(|name| self.catalog.package(name))
            .transpose()
    }

    /// Package price plus extras; extras count even without a package
    pub fn support_total(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<Money> {
        let package_price = self
            .selected_package(state, department)?
            .map(|p| p.price)
            .unwrap_or_default();

        Ok(package_price + state.support_extras(department).cost())
    }

    /// Sum of project budgets; timelines do not weight the total
    pub fn project_total(&self, state: &SessionState, department: Department) -> Money {
        state.projects(department).iter().map(|p| p.budget).sum()
    }

    pub fn grand_total(&self, state: &SessionState, department: Department) -> BudgetResult<Money> {
        Ok(self.snapshot(state, department)?.grand_total)
    }

    pub fn snapshot(
        &self,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<BudgetSnapshot> {
        Ok(BudgetSnapshot::new(
            self.operational_total(state, department)?,
            self.support_total(state, department)?,
            self.project_total(state, department),
        ))
    }

    /// Snapshot of the department currently selected in the wizard
    pub fn current_snapshot(&self, state: &SessionState) -> BudgetResult<BudgetSnapshot> {
        let department = state
            .selected_department
            .ok_or_else(|| BudgetError::Validation("No department selected".into()))?;
        self.snapshot(state, department)
    }

    /// Sum of every department's totals, for reporting only
    pub fn total_across_departments(&self, state: &SessionState) -> BudgetResult<BudgetSnapshot> {
        Department::ALL
            .iter()
            .map(|d| self.snapshot(state, *d))
            .sum()
    }

    /// Snapshots of every department with input
    pub fn snapshots(&self, state: &SessionState) -> BudgetResult<Vec<(Department, BudgetSnapshot)>> {
        state
            .active_departments()
            .into_iter()
            .map(|d| Ok((d, self.snapshot(state, d)?)))
            .collect()
    }
}
