//! Catalog CLI commands
//!
//! Browse the catalog and edit it: services, support packages and terms.
//! Every edit is validated, saved and written to the audit log.

use std::path::PathBuf;

use clap::Subcommand;

use crate::audit::Operation;
use crate::display::{
    format_department_stats, format_license_inventory, format_package_list, format_service_list,
};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Catalog, Department, PricingUnit, SupportPackage, TermsSlot};
use crate::services::{department_stats, CatalogService};
use crate::storage::catalog::write_catalog_yaml;
use crate::storage::Storage;

use super::{parse_department, parse_money};

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List services, for one department or all
    List {
        #[arg(short, long)]
        department: Option<String>,
    },

    /// List support packages
    Packages,

    /// Show the default license inventory
    Licenses,

    /// Per-department service statistics
    Stats,

    /// Add a service to a department
    #[command(name = "add-service")]
    AddService {
        department: String,
        name: String,
        /// Monthly price per unit
        #[arg(short, long)]
        price: String,
        /// One-off setup cost
        #[arg(short, long, default_value = "0")]
        setup: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Pricing unit, e.g. per-user (default depends on the department)
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Remove a service from a department
    #[command(name = "remove-service")]
    RemoveService { department: String, service: String },

    /// Add a support package
    #[command(name = "add-package")]
    AddPackage {
        name: String,
        /// Annual price
        #[arg(short, long)]
        price: String,
        #[arg(long, default_value_t = 0)]
        requests: u32,
        #[arg(long, default_value_t = 0)]
        training: u32,
        #[arg(long, default_value_t = 0)]
        reports: u32,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove a support package
    #[command(name = "remove-package")]
    RemovePackage { name: String },

    /// Replace a terms document (publishes a new version)
    Terms {
        /// system_wide, department:IT, high_value, budget_submission, ...
        slot: String,
        #[arg(short, long)]
        title: Option<String>,
        /// New terms text
        #[arg(short, long)]
        content: String,
    },

    /// Replace the catalog with a JSON or YAML file
    Import { file: PathBuf },

    /// Write the catalog as YAML
    Export { file: PathBuf },
}

/// Handle a catalog command
pub fn handle_catalog_command(storage: &Storage, cmd: CatalogCommands) -> BudgetResult<()> {
    match cmd {
        CatalogCommands::List { department } => {
            let department = department.as_deref().map(parse_department).transpose()?;
            let catalog = storage.load_catalog()?;
            print!("{}", format_service_list(&catalog, department));
        }

        CatalogCommands::Packages => {
            let catalog = storage.load_catalog()?;
            println!("{}", format_package_list(&catalog.support_packages));
        }

        CatalogCommands::Licenses => {
            let catalog = storage.load_catalog()?;
            println!("{}", format_license_inventory(&catalog.license_inventory));
        }

        CatalogCommands::Stats => {
            let catalog = storage.load_catalog()?;
            let stats: Vec<_> = Department::ALL
                .iter()
                .map(|d| department_stats(&catalog, *d))
                .collect();
            println!("{}", format_department_stats(&stats));
        }

        CatalogCommands::AddService {
            department,
            name,
            price,
            setup,
            description,
            unit,
        } => {
            let department = parse_department(&department)?;
            let unit = unit
                .as_deref()
                .map(|u| {
                    PricingUnit::parse(u).ok_or_else(|| {
                        BudgetError::Validation(format!("Unknown pricing unit '{}'", u))
                    })
                })
                .transpose()?;
            let price = parse_money(&price, "price")?;
            let setup = parse_money(&setup, "setup cost")?;

            edit_catalog(storage, Operation::Create, &format!("{}/{}", department, name), |catalog| {
                let mut service = CatalogService::new(catalog);
                let added = service.add_service(
                    department,
                    &name,
                    price,
                    setup,
                    &description,
                    unit,
                )?;
                Ok(format!(
                    "Added '{}' to {} at {} {}",
                    added.name,
                    department.title(),
                    added.pricing.unit_price,
                    added.pricing.unit
                ))
            })?;
        }

        CatalogCommands::RemoveService {
            department,
            service,
        } => {
            let department = parse_department(&department)?;
            edit_catalog(storage, Operation::Delete, &format!("{}/{}", department, service), |catalog| {
                let removed = CatalogService::new(catalog).remove_service(department, &service)?;
                Ok(format!("Removed '{}' from {}", removed.name, department.title()))
            })?;
        }

        CatalogCommands::AddPackage {
            name,
            price,
            requests,
            training,
            reports,
            description,
        } => {
            let package = SupportPackage {
                name: name.trim().to_string(),
                price: parse_money(&price, "price")?,
                support_request_quota: requests,
                training_quota: training,
                report_quota: reports,
                improvement_hours: 0,
                description,
                eligible_departments: Department::ALL.to_vec(),
            };
            edit_catalog(storage, Operation::Create, &name, |catalog| {
                CatalogService::new(catalog).add_support_package(package)?;
                Ok(format!("Added support package '{}'", name.trim()))
            })?;
        }

        CatalogCommands::RemovePackage { name } => {
            edit_catalog(storage, Operation::Delete, &name, |catalog| {
                let removed = CatalogService::new(catalog).remove_support_package(&name)?;
                Ok(format!("Removed support package '{}'", removed.name))
            })?;
        }

        CatalogCommands::Terms {
            slot,
            title,
            content,
        } => {
            let slot = TermsSlot::parse(&slot)
                .ok_or_else(|| BudgetError::Validation(format!("Unknown terms slot '{}'", slot)))?;
            edit_catalog(storage, Operation::Update, &slot.key(), |catalog| {
                let mut service = CatalogService::new(catalog);
                let document = service.update_terms(slot, title.as_deref(), &content)?;
                Ok(format!(
                    "Published '{}' version {}",
                    document.title, document.version
                ))
            })?;
        }

        CatalogCommands::Import { file } => {
            let before = storage.load_catalog()?;
            let imported = storage.catalog.import(&file)?;
            storage.log_catalog_change(
                Operation::Update,
                "catalog",
                &format!("import {}", file.display()),
                &before,
                &imported,
            )?;
            println!("Imported catalog from {}", file.display());
        }

        CatalogCommands::Export { file } => {
            let catalog = storage.load_catalog()?;
            write_catalog_yaml(&file, &catalog)?;
            println!("Wrote catalog to {}", file.display());
        }
    }

    Ok(())
}

/// Load the catalog, apply an edit, save and audit it
fn edit_catalog<F>(storage: &Storage, operation: Operation, entity_id: &str, edit: F) -> BudgetResult<()>
where
    F: FnOnce(&mut Catalog) -> BudgetResult<String>,
{
    let before = storage.load_catalog()?;
    let mut after = before.clone();
    let message = edit(&mut after)?;

    storage.catalog.save(&after)?;
    storage.log_catalog_change(operation, entity_id, &message, &before, &after)?;

    println!("{}", message);
    Ok(())
}
