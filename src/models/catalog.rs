//! Catalog models
//!
//! The catalog is the read-only input to selection editing and budget
//! calculation: service definitions per department, support packages,
//! project categories, terms documents and the seed license inventory.
//! Admin actions edit it through `CatalogService`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::department::Department;
use super::license::LicenseRecord;
use super::money::Money;
use super::terms::TermsSlot;
use crate::error::{BudgetError, BudgetResult};

/// The unit a service is priced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingUnit {
    PerUser,
    PerContract,
    PerTransaction,
    PerSupplier,
    PerAsset,
    PerSqMeter,
    PerEmployee,
    PerAccessPoint,
    PerMonitoringPoint,
    PerLocation,
    PerVehicle,
    PerRegulation,
    PerTemplate,
    PerEvent,
}

impl PricingUnit {
    /// Singular noun for the unit ("user", "sq meter", ...)
    pub fn noun(&self) -> &'static str {
        match self {
            Self::PerUser => "user",
            Self::PerContract => "contract",
            Self::PerTransaction => "transaction",
            Self::PerSupplier => "supplier",
            Self::PerAsset => "asset",
            Self::PerSqMeter => "sq meter",
            Self::PerEmployee => "employee",
            Self::PerAccessPoint => "access point",
            Self::PerMonitoringPoint => "monitoring point",
            Self::PerLocation => "location",
            Self::PerVehicle => "vehicle",
            Self::PerRegulation => "regulation",
            Self::PerTemplate => "template",
            Self::PerEvent => "event",
        }
    }

    /// Parse from "per-user", "per_user", "user", ...
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        let normalized = normalized.strip_prefix("price-").unwrap_or(&normalized);
        let normalized = normalized.strip_prefix("per-").unwrap_or(normalized);
        match normalized {
            "user" => Some(Self::PerUser),
            "contract" => Some(Self::PerContract),
            "transaction" => Some(Self::PerTransaction),
            "supplier" => Some(Self::PerSupplier),
            "asset" => Some(Self::PerAsset),
            "sq-meter" => Some(Self::PerSqMeter),
            "employee" => Some(Self::PerEmployee),
            "access-point" => Some(Self::PerAccessPoint),
            "monitoring-point" => Some(Self::PerMonitoringPoint),
            "location" => Some(Self::PerLocation),
            "vehicle" => Some(Self::PerVehicle),
            "regulation" => Some(Self::PerRegulation),
            "template" => Some(Self::PerTemplate),
            "event" => Some(Self::PerEvent),
            _ => None,
        }
    }
}

impl fmt::Display for PricingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "per {}", self.noun())
    }
}

/// How a catalog service is priced: a monthly price per unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingModel {
    pub unit: PricingUnit,
    pub unit_price: Money,
}

impl PricingModel {
    pub fn new(unit: PricingUnit, unit_price: Money) -> Self {
        Self { unit, unit_price }
    }

    /// Monthly cost for a quantity of units
    pub fn monthly_cost(&self, quantity: u32) -> Money {
        self.unit_price.times(i64::from(quantity))
    }

    /// Annual (12 month) cost for a quantity of units
    pub fn annual_cost(&self, quantity: u32) -> Money {
        self.monthly_cost(quantity).times(12)
    }
}

/// Stable key of a catalog service within its department
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Derive the key from a service name: "Microsoft 365 E3" -> "microsoft_365_e3"
    pub fn from_name(name: &str) -> Self {
        Self(name.trim().replace(' ', "_").to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A service offered by one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub key: ServiceKey,
    pub name: String,
    pub pricing: PricingModel,
    pub setup_cost: Money,
    #[serde(default)]
    pub description: String,
}

impl ServiceDefinition {
    pub fn new(
        name: impl Into<String>,
        unit: PricingUnit,
        unit_price: Money,
        setup_cost: Money,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            key: ServiceKey::from_name(&name),
            name,
            pricing: PricingModel::new(unit, unit_price),
            setup_cost,
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        if self.pricing.unit_price.is_negative() || self.setup_cost.is_negative() {
            return Err(CatalogValidationError::NegativePrice(self.name.clone()));
        }
        Ok(())
    }
}

/// A tiered bundle of support entitlements priced as a flat annual fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportPackage {
    pub name: String,
    pub price: Money,
    pub support_request_quota: u32,
    pub training_quota: u32,
    pub report_quota: u32,
    #[serde(default)]
    pub improvement_hours: u32,
    #[serde(default)]
    pub description: String,
    /// Departments allowed to pick this package
    #[serde(default = "all_departments")]
    pub eligible_departments: Vec<Department>,
}

fn all_departments() -> Vec<Department> {
    Department::ALL.to_vec()
}

impl SupportPackage {
    pub fn is_eligible(&self, department: Department) -> bool {
        self.eligible_departments.contains(&department)
    }
}

/// Terms text shown for one acceptance slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsDocument {
    pub title: String,
    pub content: String,
    #[serde(default = "default_terms_version")]
    pub version: u32,
}

fn default_terms_version() -> u32 {
    1
}

/// The complete catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub services: BTreeMap<Department, Vec<ServiceDefinition>>,
    #[serde(default)]
    pub support_packages: Vec<SupportPackage>,
    #[serde(default)]
    pub project_categories: BTreeMap<Department, Vec<String>>,
    #[serde(default)]
    pub terms: BTreeMap<TermsSlot, TermsDocument>,
    /// Seed license inventory copied into each new session
    #[serde(default)]
    pub license_inventory: Vec<LicenseRecord>,
}

impl Catalog {
    /// Services offered by a department (empty if none configured)
    pub fn services(&self, department: Department) -> &[ServiceDefinition] {
        self.services
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a service by key
    pub fn service(
        &self,
        department: Department,
        key: &ServiceKey,
    ) -> BudgetResult<&ServiceDefinition> {
        self.services(department)
            .iter()
            .find(|s| &s.key == key)
            .ok_or_else(|| BudgetError::service_not_found(format!("{}/{}", department, key)))
    }

    /// Look up a service by key or by (case-insensitive) name
    pub fn find_service(
        &self,
        department: Department,
        identifier: &str,
    ) -> BudgetResult<&ServiceDefinition> {
        let key = ServiceKey::from_name(identifier);
        self.services(department)
            .iter()
            .find(|s| s.key == key || s.name.eq_ignore_ascii_case(identifier.trim()))
            .ok_or_else(|| {
                BudgetError::service_not_found(format!("{}/{}", department, identifier))
            })
    }

    /// Look up a support package by (case-insensitive) name
    pub fn package(&self, name: &str) -> BudgetResult<&SupportPackage> {
        self.support_packages
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| BudgetError::package_not_found(name))
    }

    /// Support packages a department may choose from
    pub fn packages_for(&self, department: Department) -> Vec<&SupportPackage> {
        self.support_packages
            .iter()
            .filter(|p| p.is_eligible(department))
            .collect()
    }

    /// Project categories for a department
    pub fn project_categories(&self, department: Department) -> &[String] {
        self.project_categories
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Terms text for a slot
    pub fn terms_for(&self, slot: &TermsSlot) -> Option<&TermsDocument> {
        self.terms.get(slot)
    }

    /// Current published version of a slot's terms (1 when not configured)
    pub fn terms_version(&self, slot: &TermsSlot) -> u32 {
        self.terms_for(slot).map(|t| t.version).unwrap_or(1)
    }

    /// Seed license record for a service, if it is an existing contract
    pub fn license_for(&self, key: &ServiceKey) -> Option<&LicenseRecord> {
        self.license_inventory.iter().find(|r| &r.service_key == key)
    }

    /// Validate every entry; keys must be unique within a department
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        for (department, services) in &self.services {
            let mut seen = std::collections::BTreeSet::new();
            for service in services {
                service.validate()?;
                if !seen.insert(&service.key) {
                    return Err(CatalogValidationError::DuplicateService {
                        department: *department,
                        key: service.key.to_string(),
                    });
                }
            }
        }

        for package in &self.support_packages {
            if package.name.trim().is_empty() {
                return Err(CatalogValidationError::EmptyName);
            }
            if package.price.is_negative() {
                return Err(CatalogValidationError::NegativePrice(package.name.clone()));
            }
        }

        for record in &self.license_inventory {
            record
                .validate()
                .map_err(|e| CatalogValidationError::License(e.to_string()))?;
        }

        Ok(())
    }
}

/// Validation errors for catalog contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyName,
    NegativePrice(String),
    DuplicateService { department: Department, key: String },
    License(String),
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Catalog entry name cannot be empty"),
            Self::NegativePrice(name) => write!(f, "Price of '{}' cannot be negative", name),
            Self::DuplicateService { department, key } => {
                write!(f, "Duplicate service '{}' in {}", key, department)
            }
            Self::License(msg) => write!(f, "Invalid license record: {}", msg),
        }
    }
}

impl std::error::Error for CatalogValidationError {}
