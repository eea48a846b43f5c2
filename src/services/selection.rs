//! Selection editing
//!
//! Every mutation of a department's selections goes through here so costs
//! are resolved once, at selection time, against the catalog and the
//! license inventory.

use tracing::debug;

use crate::config::settings::LicenseReductionPolicy;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    Catalog, CustomServiceEntry, Department, ImplementationProject, ProjectPatch, ProjectSort,
    ServiceSelection, SupportExtras, SupportPackage,
};
use crate::session::SessionState;

use super::license::{LicenseResolver, ResolvedCost};

/// Result of selecting a catalog service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selection: ServiceSelection,
    pub cost: ResolvedCost,
}

/// Service for editing per-department selections
pub struct SelectionService<'a> {
    catalog: &'a Catalog,
    resolver: LicenseResolver,
}

impl<'a> SelectionService<'a> {
    pub fn new(catalog: &'a Catalog, policy: LicenseReductionPolicy) -> Self {
        Self {
            catalog,
            resolver: LicenseResolver::new(policy),
        }
    }

    /// Select a catalog service with a quantity
    pub fn select_service(
        &self,
        state: &mut SessionState,
        department: Department,
        service: &str,
        quantity: u32,
        is_new_implementation: bool,
    ) -> BudgetResult<SelectOutcome> {
        let definition = self.catalog.find_service(department, service)?;
        let record = state.license(department, &definition.key);
        let cost = self
            .resolver
            .resolve(definition, record, quantity, is_new_implementation)?;

        let selection = ServiceSelection::selected(
            definition.key.clone(),
            cost.effective,
            is_new_implementation,
            cost.annual_cost,
            cost.setup_cost,
        );

        debug!(
            department = %department,
            service = %definition.key,
            quantity = cost.effective,
            annual_cost = %cost.annual_cost,
            "service selected"
        );

        state
            .operational_services
            .entry(department)
            .or_default()
            .insert(definition.key.clone(), selection.clone());

        Ok(SelectOutcome { selection, cost })
    }

    /// Clear a catalog service; repeating it changes nothing
    ///
    /// Services that were never selected leave no entry behind.
    pub fn deselect_service(
        &self,
        state: &mut SessionState,
        department: Department,
        service: &str,
    ) -> BudgetResult<ServiceSelection> {
        let definition = self.catalog.find_service(department, service)?;
        let selection = ServiceSelection::deselected(definition.key.clone());

        if let Some(existing) = state
            .operational_services
            .get_mut(&department)
            .and_then(|selections| selections.get_mut(&definition.key))
        {
            *existing = selection.clone();
        }

        debug!(department = %department, service = %definition.key, "service deselected");
        Ok(selection)
    }

    /// Add a custom service; returns its index in the department list
    pub fn add_custom_service(
        &self,
        state: &mut SessionState,
        department: Department,
        entry: CustomServiceEntry,
    ) -> BudgetResult<usize> {
        entry
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let list = state.custom_services.entry(department).or_default();
        list.push(entry);
        Ok(list.len() - 1)
    }

    pub fn remove_custom_service(
        &self,
        state: &mut SessionState,
        department: Department,
        index: usize,
    ) -> BudgetResult<CustomServiceEntry> {
        let list = state.custom_services.entry(department).or_default();
        if index >= list.len() {
            return Err(BudgetError::custom_service_not_found(format!(
                "{} #{}",
                department, index
            )));
        }
        let removed = list.remove(index);
        if list.is_empty() {
            state.custom_services.remove(&department);
        }
        Ok(removed)
    }

    /// Select the department's single support package, replacing any other
    pub fn select_support_package(
        &self,
        state: &mut SessionState,
        department: Department,
        name: &str,
    ) -> BudgetResult<&'a SupportPackage> {
        let package = self.catalog.package(name)?;
        if !package.is_eligible(department) {
            return Err(BudgetError::Validation(format!(
                "Support package '{}' is not available for {}",
                package.name, department
            )));
        }

        state
            .support_packages
            .insert(department, package.name.clone());
        Ok(package)
    }

    /// Returns the name of the cleared package, if there was one
    pub fn clear_support_package(
        &self,
        state: &mut SessionState,
        department: Department,
    ) -> Option<String> {
        state.support_packages.remove(&department)
    }

    pub fn set_support_extras(
        &self,
        state: &mut SessionState,
        department: Department,
        extras: SupportExtras,
    ) {
        if extras.is_empty() {
            state.support_extras.remove(&department);
        } else {
            state.support_extras.insert(department, extras);
        }
    }

    /// Add a project; returns its index in the department list
    pub fn add_project(
        &self,
        state: &mut SessionState,
        department: Department,
        project: ImplementationProject,
    ) -> BudgetResult<usize> {
        project
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let list = state.implementation_projects.entry(department).or_default();
        list.push(project);
        Ok(list.len() - 1)
    }

    /// Apply a partial update; the project is validated as a whole afterwards
    pub fn update_project(
        &self,
        state: &mut SessionState,
        department: Department,
        index: usize,
        patch: &ProjectPatch,
    ) -> BudgetResult<ImplementationProject> {
        let project = state
            .implementation_projects
            .get_mut(&department)
            .and_then(|list| list.get_mut(index))
            .ok_or_else(|| BudgetError::project_not_found(format!("{} #{}", department, index)))?;

        let mut updated = project.clone();
        updated.apply_patch(patch);
        updated
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        *project = updated.clone();
        Ok(updated)
    }

    pub fn remove_project(
        &self,
        state: &mut SessionState,
        department: Department,
        index: usize,
    ) -> BudgetResult<ImplementationProject> {
        let list = state.implementation_projects.entry(department).or_default();
        if index >= list.len() {
            return Err(BudgetError::project_not_found(format!(
                "{} #{}",
                department, index
            )));
        }
        let removed = list.remove(index);
        if list.is_empty() {
            state.implementation_projects.remove(&department);
        }
        Ok(removed)
    }

    /// Projects with their stored index, sorted for display
    pub fn sorted_projects<'s>(
        &self,
        state: &'s SessionState,
        department: Department,
        sort: Option<ProjectSort>,
    ) -> Vec<(usize, &'s ImplementationProject)> {
        let mut projects: Vec<_> = state.projects(department).iter().enumerate().collect();
        if let Some(sort) = sort {
            projects.sort_by(|(_, a), (_, b)| sort.compare(a, b));
        }
        projects
    }
}
