//! Per-session wizard state
//!
//! One typed document holds everything a user has entered. It serializes to
//! the persisted layout (camelCase top-level keys) and round-trips exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    Catalog, CompanyInfo, CustomServiceEntry, Department, ImplementationProject, LicenseRecord,
    ServiceKey, ServiceSelection, Submission, SupportExtras, TermsLedger, WorkflowStep,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub company_info: CompanyInfo,

    #[serde(default)]
    pub selected_department: Option<Department>,

    #[serde(default)]
    pub operational_services: BTreeMap<Department, BTreeMap<ServiceKey, ServiceSelection>>,

    #[serde(default)]
    pub custom_services: BTreeMap<Department, Vec<CustomServiceEntry>>,

    /// Selected support package name per department
    #[serde(default)]
    pub support_packages: BTreeMap<Department, String>,

    #[serde(default)]
    pub support_extras: BTreeMap<Department, SupportExtras>,

    #[serde(default)]
    pub implementation_projects: BTreeMap<Department, Vec<ImplementationProject>>,

    /// Committed license counts of existing contracts, keyed by service
    #[serde(default)]
    pub current_licenses: BTreeMap<ServiceKey, LicenseRecord>,

    #[serde(default)]
    pub terms_accepted: TermsLedger,

    #[serde(default)]
    pub current_step: WorkflowStep,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submissions: Vec<Submission>,
}

impl SessionState {
    /// A fresh session seeded with the catalog's license inventory
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            current_licenses: catalog
                .license_inventory
                .iter()
                .map(|r| (r.service_key.clone(), r.clone()))
                .collect(),
            ..Self::default()
        }
    }

    /// Service selections of a department, ordered by key
    pub fn selections(&self, department: Department) -> impl Iterator<Item = &ServiceSelection> {
        self.operational_services
            .get(&department)
            .into_iter()
            .flat_map(|m| m.values())
    }

    pub fn selection(&self, department: Department, key: &ServiceKey) -> Option<&ServiceSelection> {
        self.operational_services
            .get(&department)
            .and_then(|m| m.get(key))
    }

    pub fn custom_services(&self, department: Department) -> &[CustomServiceEntry] {
        self.custom_services
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn support_package(&self, department: Department) -> Option<&str> {
        self.support_packages.get(&department).map(String::as_str)
    }

    pub fn support_extras(&self, department: Department) -> SupportExtras {
        self.support_extras
            .get(&department)
            .copied()
            .unwrap_or_default()
    }

    pub fn projects(&self, department: Department) -> &[ImplementationProject] {
        self.implementation_projects
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// License record for a service, only for departments that track them
    pub fn license(&self, department: Department, key: &ServiceKey) -> Option<&LicenseRecord> {
        if department.has_license_inventory() {
            self.current_licenses.get(key)
        } else {
            None
        }
    }

    /// Whether the user entered anything for a department
    pub fn has_selections(&self, department: Department) -> bool {
        self.selections(department).any(|s| s.selected)
            || !self.custom_services(department).is_empty()
            || self.support_package(department).is_some()
            || !self.support_extras(department).is_empty()
            || !self.projects(department).is_empty()
    }

    /// Departments with any input, in catalog order
    pub fn active_departments(&self) -> Vec<Department> {
        Department::ALL
            .iter()
            .copied()
            .filter(|d| self.has_selections(*d))
            .collect()
    }

    /// JSON view of one department's inputs, used for audit before/after
    pub fn department_slice(&self, department: Department) -> serde_json::Value {
        serde_json::json!({
            "department": department,
            "operationalServices": self.operational_services.get(&department),
            "customServices": self.custom_services(department),
            "supportPackage": self.support_package(department),
            "supportExtras": self.support_extras(department),
            "implementationProjects": self.projects(department),
        })
    }

    /// JSON view of the non-department parts of the session
    pub fn workflow_slice(&self) -> serde_json::Value {
        serde_json::json!({
            "companyInfo": self.company_info,
            "selectedDepartment": self.selected_department,
            "termsAccepted": self.terms_accepted,
            "currentStep": self.current_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Timeline};
    use crate::storage::init::default_catalog;

    #[test]
    fn test_new_session_seeds_licenses() {
        let state = SessionState::new(&default_catalog());
        assert_eq!(state.current_licenses.len(), 3);
        assert_eq!(state.current_step, WorkflowStep::CompanyInfo);
        assert!(state.selected_department.is_none());

        let key = ServiceKey::from_name("Microsoft 365 E3");
        assert!(state.license(Department::It, &key).is_some());
        assert!(state.license(Department::Hr, &key).is_none());
    }

    #[test]
    fn test_persisted_layout_keys() {
        let state = SessionState::new(&default_catalog());
        let value = serde_json::to_value(&state).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "companyInfo",
            "selectedDepartment",
            "operationalServices",
            "customServices",
            "supportPackages",
            "supportExtras",
            "implementationProjects",
            "currentLicenses",
            "termsAccepted",
            "currentStep",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert!(!object.contains_key("submissions"));
        assert_eq!(object["currentStep"], "company_info");
    }

    #[test]
    fn test_round_trip() {
        let mut state = SessionState::new(&default_catalog());
        state.selected_department = Some(Department::Legal);
        state
            .support_packages
            .insert(Department::Legal, "Silver".to_string());
        state.implementation_projects.insert(
            Department::Legal,
            vec![ImplementationProject::new(
                "Clause library",
                "Standard clauses",
                Timeline::Q3,
                Money::from_units(40_000),
            )],
        );

        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_active_departments() {
        let mut state = SessionState::default();
        assert!(state.active_departments().is_empty());

        state
            .support_extras
            .insert(Department::Hr, SupportExtras::new(1, 0, 0));
        assert_eq!(state.active_departments(), vec![Department::Hr]);
    }
}
