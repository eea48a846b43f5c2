//! Catalog display formatting
//!
//! Service, support package and license inventory tables.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Catalog, Department, LicenseRecord, SupportPackage};
use crate::services::DepartmentStats;

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Monthly Price")]
    unit_price: String,
    #[tabled(rename = "Setup")]
    setup: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Annual Price")]
    price: String,
    #[tabled(rename = "Requests")]
    requests: u32,
    #[tabled(rename = "Training")]
    training: u32,
    #[tabled(rename = "Reports")]
    reports: u32,
    #[tabled(rename = "Departments")]
    departments: String,
}

#[derive(Tabled)]
struct LicenseRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Current")]
    current: u32,
    #[tabled(rename = "Minimum")]
    minimum: u32,
    #[tabled(rename = "Reducible")]
    reducible: &'static str,
    #[tabled(rename = "Floor")]
    floor: u32,
    #[tabled(rename = "Contract End")]
    contract_end: String,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Services")]
    services: usize,
    #[tabled(rename = "Avg Monthly Price")]
    average: String,
    #[tabled(rename = "Total Setup")]
    setup: String,
}

/// Format the services of one department, or of every department
pub fn format_service_list(catalog: &Catalog, department: Option<Department>) -> String {
    let departments = match department {
        Some(d) => vec![d],
        None => Department::ALL.to_vec(),
    };

    let mut output = String::new();
    for department in departments {
        let services = catalog.services(department);
        output.push_str(&format!("{}\n", department.title()));
        if services.is_empty() {
            output.push_str("  No services configured.\n\n");
            continue;
        }

        let rows = services.iter().map(|s| ServiceRow {
            name: s.name.clone(),
            unit: s.pricing.unit.to_string(),
            unit_price: s.pricing.unit_price.to_string(),
            setup: s.setup_cost.to_string(),
            description: s.description.clone(),
        });
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        output.push_str(&table.to_string());
        output.push_str("\n\n");
    }
    output
}

/// Format support packages as a table
pub fn format_package_list(packages: &[SupportPackage]) -> String {
    if packages.is_empty() {
        return "No support packages configured.".to_string();
    }

    let rows = packages.iter().map(|p| PackageRow {
        name: p.name.clone(),
        price: p.price.to_string(),
        requests: p.support_request_quota,
        training: p.training_quota,
        reports: p.report_quota,
        departments: if p.eligible_departments.len() == Department::ALL.len() {
            "all".to_string()
        } else {
            p.eligible_departments
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        },
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// Format license records as a table
pub fn format_license_inventory<'a>(records: impl IntoIterator<Item = &'a LicenseRecord>) -> String {
    let rows: Vec<LicenseRow> = records
        .into_iter()
        .map(|r| LicenseRow {
            service: r.service_key.to_string(),
            current: r.current_count,
            minimum: r.min_commitment,
            reducible: if r.can_reduce { "yes" } else { "no" },
            floor: r.floor(),
            contract_end: r.contract_end_date.to_string(),
        })
        .collect();

    if rows.is_empty() {
        return "No license contracts on record.".to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

pub fn format_department_stats(stats: &[DepartmentStats]) -> String {
    let rows = stats.iter().map(|s| StatsRow {
        department: s.department.title().to_string(),
        services: s.service_count,
        average: s.average_unit_price.to_string(),
        setup: s.total_setup_cost.to_string(),
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::department_stats;
    use crate::storage::init::default_catalog;

    #[test]
    fn test_service_list() {
        let catalog = default_catalog();
        let output = format_service_list(&catalog, Some(Department::Legal));

        assert!(output.contains("Contract Management System"));
        assert!(output.contains("per contract"));
        assert!(output.contains("20,000.00"));
        assert!(!output.contains("Microsoft 365 E3"));
    }

    #[test]
    fn test_package_list() {
        let catalog = default_catalog();
        let output = format_package_list(&catalog.support_packages);

        assert!(output.contains("Platinum"));
        assert!(output.contains("2,500,000.00"));
        assert!(output.contains("all"));
        assert_eq!(format_package_list(&[]), "No support packages configured.");
    }

    #[test]
    fn test_license_inventory() {
        let catalog = default_catalog();
        let output = format_license_inventory(&catalog.license_inventory);
        assert!(output.contains("2025-12-31"));

        let empty: Vec<LicenseRecord> = Vec::new();
        assert_eq!(format_license_inventory(&empty), "No license contracts on record.");
    }

    #[test]
    fn test_department_stats() {
        let catalog = default_catalog();
        let stats = vec![department_stats(&catalog, Department::It)];
        let output = format_department_stats(&stats);
        assert!(output.contains("Information Technology"));
        assert!(output.contains("Total Setup"));
    }
}
