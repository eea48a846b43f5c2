//! Catalog administration
//!
//! Editing of the catalog itself: services per department, support
//! packages and terms documents. Sessions keep referencing services by key,
//! so removing a service makes existing selections of it fail to price.

use serde::Serialize;
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    Catalog, Department, Money, PricingUnit, ServiceDefinition, ServiceKey, SupportPackage,
    TermsDocument, TermsSlot,
};

/// Per-department catalog statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub department: Department,
    pub service_count: usize,
    pub average_unit_price: Money,
    pub total_setup_cost: Money,
}

/// Service for editing the catalog
pub struct CatalogService<'a> {
    catalog: &'a mut Catalog,
}

impl<'a> CatalogService<'a> {
    pub fn new(catalog: &'a mut Catalog) -> Self {
        Self { catalog }
    }

    /// Add a service; without a unit the department's default is used
    pub fn add_service(
        &mut self,
        department: Department,
        name: &str,
        unit_price: Money,
        setup_cost: Money,
        description: &str,
        unit: Option<PricingUnit>,
    ) -> BudgetResult<&ServiceDefinition> {
        let unit = unit.unwrap_or_else(|| department.default_pricing_unit());
        let service = ServiceDefinition::new(name.trim(), unit, unit_price, setup_cost, description);
        service
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let services = self.catalog.services.entry(department).or_default();
        if services.iter().any(|s| s.key == service.key) {
            return Err(BudgetError::Duplicate {
                entity_type: "Service",
                identifier: format!("{}/{}", department, service.name),
            });
        }

        info!(department = %department, service = %service.name, "catalog service added");
        services.push(service);
        let index = services.len() - 1;
        Ok(&services[index])
    }

    pub fn remove_service(
        &mut self,
        department: Department,
        identifier: &str,
    ) -> BudgetResult<ServiceDefinition> {
        let key = self.catalog.find_service(department, identifier)?.key.clone();
        let services = self.catalog.services.entry(department).or_default();
        let index = services
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| BudgetError::service_not_found(identifier))?;

        let removed = services.remove(index);
        info!(department = %department, service = %removed.name, "catalog service removed");
        Ok(removed)
    }

    /// Replace a terms document; the version moves past the previous one
    pub fn update_terms(
        &mut self,
        slot: TermsSlot,
        title: Option<&str>,
        content: &str,
    ) -> BudgetResult<&TermsDocument> {
        if content.trim().is_empty() {
            return Err(BudgetError::Validation("Terms content cannot be empty".into()));
        }

        let document = self
            .catalog
            .terms
            .entry(slot)
            .or_insert_with(|| TermsDocument {
                title: slot.to_string(),
                content: String::new(),
                version: 0,
            });
        if let Some(title) = title {
            document.title = title.to_string();
        }
        document.content = content.to_string();
        document.version += 1;

        info!(slot = %slot, version = document.version, "terms updated");
        Ok(document)
    }

    pub fn add_support_package(&mut self, package: SupportPackage) -> BudgetResult<()> {
        if package.name.trim().is_empty() {
            return Err(BudgetError::Validation("Package name cannot be empty".into()));
        }
        if package.price.is_negative() {
            return Err(BudgetError::Validation(format!(
                "Price of '{}' cannot be negative",
                package.name
            )));
        }
        if self.catalog.package(&package.name).is_ok() {
            return Err(BudgetError::Duplicate {
                entity_type: "Support package",
                identifier: package.name,
            });
        }

        info!(package = %package.name, "support package added");
        self.catalog.support_packages.push(package);
        Ok(())
    }

    pub fn remove_support_package(&mut self, name: &str) -> BudgetResult<SupportPackage> {
        let index = self
            .catalog
            .support_packages
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| BudgetError::package_not_found(name))?;
        Ok(self.catalog.support_packages.remove(index))
    }

    pub fn stats(&self, department: Department) -> DepartmentStats {
        department_stats(self.catalog, department)
    }
}

/// Statistics for one department's services
pub fn department_stats(catalog: &Catalog, department: Department) -> DepartmentStats {
    let services = catalog.services(department);
    let total_price: Money = services.iter().map(|s| s.pricing.unit_price).sum();
    let average_unit_price = if services.is_empty() {
        Money::zero()
    } else {
        Money::from_minor(total_price.minor() / services.len() as i64)
    };

    DepartmentStats {
        department,
        service_count: services.len(),
        average_unit_price,
        total_setup_cost: services.iter().map(|s| s.setup_cost).sum(),
    }
}

/// Whether a service key still resolves in the catalog
pub fn service_exists(catalog: &Catalog, department: Department, key: &ServiceKey) -> bool {
    catalog.service(department, key).is_ok()
}
