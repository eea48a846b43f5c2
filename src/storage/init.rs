//! Storage initialization
//!
//! First-run setup: the default catalog and settings file.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::paths::WizardPaths;
use crate::config::settings::Settings;
use crate::error::BudgetError;
use crate::models::{
    Catalog, Department, LicenseRecord, Money, PricingUnit, ServiceDefinition, ServiceKey,
    SupportPackage, TermsDocument, TermsSlot,
};

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing catalog and settings files are left alone.
pub fn initialize_storage(paths: &WizardPaths) -> Result<(), BudgetError> {
    paths.ensure_directories()?;

    if !paths.catalog_file().exists() {
        write_json_atomic(paths.catalog_file(), &default_catalog())?;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &WizardPaths) -> bool {
    !paths.catalog_file().exists()
}

/// The catalog shipped with the wizard
pub fn default_catalog() -> Catalog {
    let mut services = BTreeMap::new();
    services.insert(Department::It, it_services());
    services.insert(Department::Hr, hr_services());
    services.insert(Department::Legal, legal_services());
    services.insert(Department::Procurement, procurement_services());
    services.insert(Department::FacilitySafety, facility_services());

    Catalog {
        companies: [
            "APC", "AIC", "AGC", "APS", "PS", "AWPT", "AMIC", "ACC", "SPC", "Tom Egypt",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        services,
        support_packages: support_packages(),
        project_categories: project_categories(),
        terms: terms_documents(),
        license_inventory: license_inventory(),
    }
}

fn service(name: &str, unit: PricingUnit, price: i64, setup: i64, description: &str) -> ServiceDefinition {
    ServiceDefinition::new(
        name,
        unit,
        Money::from_units(price),
        Money::from_units(setup),
        description,
    )
}

fn it_services() -> Vec<ServiceDefinition> {
    vec![
        service("Microsoft 365 E3", PricingUnit::PerUser, 82, 5000, "Premium productivity suite with advanced security and compliance"),
        service("Oracle ERP Cloud", PricingUnit::PerUser, 180, 25000, "Complete enterprise resource planning solution"),
        service("Power BI Premium", PricingUnit::PerUser, 75, 4000, "Advanced business intelligence platform"),
        service("Microsoft Teams Phone", PricingUnit::PerUser, 28, 3000, "Cloud-based phone system integrated with Teams"),
    ]
}

fn hr_services() -> Vec<ServiceDefinition> {
    vec![
        service("Talent Acquisition Platform", PricingUnit::PerUser, 120, 15000, "End-to-end recruitment and hiring platform"),
        service("Learning Management System", PricingUnit::PerUser, 45, 8000, "Employee training and development platform"),
        service("Performance Management", PricingUnit::PerUser, 65, 12000, "Goal setting and performance review system"),
        service("HR Analytics Dashboard", PricingUnit::PerUser, 85, 10000, "Workforce analytics and reporting platform"),
    ]
}

fn legal_services() -> Vec<ServiceDefinition> {
    vec![
        service("Contract Management System", PricingUnit::PerContract, 250, 20000, "Lifecycle contract management and compliance"),
        service("Legal Research Platform", PricingUnit::PerUser, 150, 5000, "Comprehensive legal research and documentation"),
        service("Compliance Management", PricingUnit::PerRegulation, 500, 15000, "Regulatory compliance tracking and reporting"),
        service("IP Management System", PricingUnit::PerAsset, 100, 12000, "Intellectual property portfolio management"),
    ]
}

fn procurement_services() -> Vec<ServiceDefinition> {
    vec![
        service("E-Procurement Platform", PricingUnit::PerTransaction, 25, 18000, "Digital procurement and supplier management"),
        service("Supplier Portal", PricingUnit::PerSupplier, 120, 8000, "Supplier onboarding and management portal"),
        service("Contract Management", PricingUnit::PerContract, 150, 12000, "Procurement contract lifecycle management"),
        service("Spend Analytics", PricingUnit::PerUser, 95, 10000, "Procurement spend analysis and reporting"),
    ]
}

fn facility_services() -> Vec<ServiceDefinition> {
    vec![
        service("Facility Management System", PricingUnit::PerSqMeter, 12, 25000, "Comprehensive facility operations management"),
        service("Safety Management Platform", PricingUnit::PerEmployee, 45, 18000, "Workplace safety tracking and compliance"),
        service("Security Access Control", PricingUnit::PerAccessPoint, 180, 35000, "Physical security and access management"),
        service("Environmental Monitoring", PricingUnit::PerMonitoringPoint, 250, 15000, "Environmental compliance and monitoring"),
    ]
}

fn support_packages() -> Vec<SupportPackage> {
    let package = |name: &str, price: i64, requests: u32, training: u32, reports: u32, hours: u32, description: &str| {
        SupportPackage {
            name: name.to_string(),
            price: Money::from_units(price),
            support_request_quota: requests,
            training_quota: training,
            report_quota: reports,
            improvement_hours: hours,
            description: description.to_string(),
            eligible_departments: Department::ALL.to_vec(),
        }
    };

    vec![
        package("Basic", 52_000, 50, 0, 0, 0, "Essential support for small teams"),
        package("Bronze", 195_975, 100, 2, 2, 20, "Enhanced support for growing organizations"),
        package("Silver", 649_498, 400, 5, 5, 60, "Comprehensive support for medium enterprises"),
        package("Gold", 1_578_139, 1000, 10, 10, 150, "Premium support for large organizations"),
        package("Platinum", 2_500_000, 1575, 20, 15, 300, "Enterprise-grade support with dedicated resources"),
    ]
}

fn project_categories() -> BTreeMap<Department, Vec<String>> {
    let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let mut categories = BTreeMap::new();
    categories.insert(
        Department::It,
        list(&["Digital Transformation", "Infrastructure", "Enterprise Applications", "Process Automation (RPA)", "Cybersecurity"]),
    );
    categories.insert(
        Department::Hr,
        list(&["Talent Management", "Learning & Development", "HR Operations", "Organizational Effectiveness"]),
    );
    categories.insert(
        Department::Legal,
        list(&["Contract Lifecycle", "Regulatory Compliance", "Risk Management", "Intellectual Property"]),
    );
    categories.insert(
        Department::Procurement,
        list(&["Sourcing", "Supplier Management", "Supply Chain Optimization", "Spend Control"]),
    );
    categories.insert(
        Department::FacilitySafety,
        list(&["Facility Upgrades", "Workplace Safety", "Security", "Environmental Compliance"]),
    );
    categories
}

fn terms_documents() -> BTreeMap<TermsSlot, TermsDocument> {
    let doc = |title: &str, sections: &[(&str, &str)]| TermsDocument {
        title: title.to_string(),
        content: sections
            .iter()
            .map(|(heading, body)| format!("## {}\n{}", heading, body))
            .collect::<Vec<_>>()
            .join("\n\n"),
        version: 1,
    };

    let mut terms = BTreeMap::new();
    terms.insert(
        TermsSlot::SystemWide,
        doc(
            "System-Wide Terms & Conditions",
            &[
                ("General Usage Terms", "By accessing and using the Shared Services Budgeting System, you agree to comply with these terms and conditions."),
                ("Data Privacy & Security", "All data entered into the system is protected under our data protection policies in compliance with applicable regulations."),
                ("Service Framework", "This system facilitates the selection and budgeting of shared services across group companies."),
                ("User Responsibilities", "Users are responsible for accurate data entry and compliance with company policies when submitting budget requests."),
                ("Limitation of Liability", "The shared services departments provide services in good faith and limit liability as outlined in individual service agreements."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::Department(Department::It),
        doc(
            "IT Shared Services Terms",
            &[
                ("Software Licensing Obligations", "Users must comply with all software license terms and usage restrictions."),
                ("Data Security Requirements", "IT services include security protocols that must be followed by all users."),
                ("System Integration Responsibilities", "Companies requesting IT services must provide necessary access and cooperation for implementations."),
                ("Support Procedures", "Support requests must follow established procedures and service level agreements."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::Department(Department::Hr),
        doc(
            "HR Shared Services Terms",
            &[
                ("Employee Data Privacy", "All HR services comply with employment law and data privacy regulations."),
                ("Training Obligations", "Companies must ensure employee participation in required training programs."),
                ("Performance Management Participation", "HR services require active participation in performance management processes."),
                ("Employment Policy Compliance", "All HR services must align with company employment policies and procedures."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::Department(Department::Legal),
        doc(
            "Legal Shared Services Terms",
            &[
                ("Attorney-Client Privilege", "Legal services maintain attorney-client privilege where applicable."),
                ("Conflict Disclosure", "Companies must disclose any potential conflicts of interest."),
                ("Legal Advice Limitations", "Legal services are provided within the scope of shared services agreements."),
                ("Document Retention", "Legal documents must be retained according to regulatory requirements."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::Department(Department::Procurement),
        doc(
            "Procurement Shared Services Terms",
            &[
                ("Purchase Commitments", "Companies must honor purchase commitments made through the procurement system."),
                ("Supplier Compliance", "All suppliers must meet group compliance requirements."),
                ("Contract Procedures", "Procurement contracts must follow established procedures and approval workflows."),
                ("Payment Terms", "Payment obligations must be met according to agreed terms and conditions."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::Department(Department::FacilitySafety),
        doc(
            "Facilities & Safety Shared Services Terms",
            &[
                ("Safety Compliance", "All facility users must comply with safety protocols and procedures."),
                ("Facility Access Rules", "Access to facilities is governed by security and safety protocols."),
                ("Emergency Procedures", "Users must be familiar with and follow emergency response procedures."),
                ("Environmental Compliance", "All activities must comply with environmental regulations and policies."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::HighValue,
        doc(
            "High-Value Budget Terms",
            &[
                ("Executive Approval", "Budgets above SAR 100,000 require sign-off by an authorized executive of the requesting company."),
                ("Phased Delivery", "High-value commitments may be delivered and invoiced in phases agreed with the shared services department."),
                ("Review Rights", "The shared services department may request supporting business cases before approval."),
            ],
        ),
    );
    terms.insert(
        TermsSlot::BudgetSubmission,
        doc(
            "Budget Submission Legal Framework",
            &[
                ("Authority Confirmation", "I confirm that I have the authority to commit company resources for the selected services."),
                ("Budget Accuracy", "I warrant that the budget information provided is accurate to the best of my knowledge."),
                ("Funding Commitment", "My company commits to funding the approved services as outlined in this submission."),
                ("Contract Formation", "I understand that budget approval creates binding service obligations."),
            ],
        ),
    );
    terms
}

fn license_inventory() -> Vec<LicenseRecord> {
    // Dates are fixed constants, so these conversions cannot fail
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        LicenseRecord::new(ServiceKey::from_name("Microsoft 365 E3"), 150, date(2025, 12, 31), 50, false),
        LicenseRecord::new(ServiceKey::from_name("Oracle ERP Cloud"), 40, date(2026, 6, 30), 40, false),
        LicenseRecord::new(ServiceKey::from_name("Power BI Premium"), 25, date(2025, 9, 30), 10, true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json_required;
    use tempfile::TempDir;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.companies.len(), 10);
        for department in Department::ALL {
            assert_eq!(catalog.services(department).len(), 4);
            assert!(catalog.terms_for(&TermsSlot::Department(department)).is_some());
        }
        assert_eq!(catalog.support_packages.len(), 5);
        assert_eq!(catalog.license_inventory.len(), 3);
    }

    #[test]
    fn test_default_prices() {
        let catalog = default_catalog();
        let m365 = catalog.find_service(Department::It, "Microsoft 365 E3").unwrap();
        assert_eq!(m365.pricing.unit_price, Money::from_units(82));
        assert_eq!(m365.setup_cost, Money::from_units(5000));

        let access = catalog
            .find_service(Department::FacilitySafety, "Security Access Control")
            .unwrap();
        assert_eq!(access.pricing.unit, PricingUnit::PerAccessPoint);

        assert_eq!(catalog.package("Bronze").unwrap().price, Money::from_units(195_975));
    }

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));
        assert!(paths.is_initialized());

        let catalog: Catalog = read_json_required(paths.catalog_file()).unwrap();
        assert_eq!(catalog, default_catalog());
    }

    #[test]
    fn test_doesnt_overwrite_existing_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let mut custom = default_catalog();
        custom.companies = vec!["Custom Co".to_string()];
        write_json_atomic(paths.catalog_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let catalog: Catalog = read_json_required(paths.catalog_file()).unwrap();
        assert_eq!(catalog.companies, vec!["Custom Co".to_string()]);
    }
}
