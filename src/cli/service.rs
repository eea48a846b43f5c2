//! Operational service CLI commands
//!
//! Catalog service selection and custom services of a department.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_license_inventory;
use crate::error::BudgetResult;
use crate::session::Command;
use crate::storage::Storage;

use super::{apply_to_session, parse_department, parse_money};

/// Service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Select a catalog service with a quantity
    Select {
        session: String,
        department: String,
        /// Service name or key
        service: String,
        #[arg(short, long)]
        quantity: u32,
        /// First-time implementation (adds setup cost)
        #[arg(long = "new")]
        is_new: bool,
    },

    /// Clear a service selection
    Deselect {
        session: String,
        department: String,
        service: String,
    },

    /// Add a service that is not in the catalog
    #[command(name = "add-custom")]
    AddCustom {
        session: String,
        department: String,
        name: String,
        #[arg(short, long)]
        description: String,
        /// Recurring yearly cost
        #[arg(short, long)]
        cost: String,
        /// One-off setup cost
        #[arg(long, default_value = "0")]
        setup: String,
    },

    /// Remove a custom service by position
    #[command(name = "remove-custom")]
    RemoveCustom {
        session: String,
        department: String,
        index: usize,
    },

    /// List selections of a department, with license contracts for IT
    List { session: String, department: String },
}

/// Handle a service command
pub fn handle_service_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ServiceCommands,
) -> BudgetResult<()> {
    let (session, command) = match cmd {
        ServiceCommands::Select {
            session,
            department,
            service,
            quantity,
            is_new,
        } => (
            session,
            Command::SelectService {
                department: parse_department(&department)?,
                service,
                quantity,
                is_new,
            },
        ),
        ServiceCommands::Deselect {
            session,
            department,
            service,
        } => (
            session,
            Command::DeselectService {
                department: parse_department(&department)?,
                service,
            },
        ),
        ServiceCommands::AddCustom {
            session,
            department,
            name,
            description,
            cost,
            setup,
        } => (
            session,
            Command::AddCustomService {
                department: parse_department(&department)?,
                name,
                description,
                recurring_cost: parse_money(&cost, "cost")?,
                setup_cost: parse_money(&setup, "setup cost")?,
            },
        ),
        ServiceCommands::RemoveCustom {
            session,
            department,
            index,
        } => (
            session,
            Command::RemoveCustomService {
                department: parse_department(&department)?,
                index,
            },
        ),
        ServiceCommands::List {
            session,
            department,
        } => {
            let department = parse_department(&department)?;
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;

            let mut any = false;
            for selection in state.selections(department).filter(|s| s.selected) {
                let name = catalog
                    .service(department, &selection.service_key)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|_| selection.service_key.to_string());
                let new_marker = if selection.is_new_implementation { " (new)" } else { "" };
                println!(
                    "{:<36} x{:<6} {:>16}{}",
                    name,
                    selection.requested_quantity,
                    selection.computed_annual_cost.to_string(),
                    new_marker
                );
                any = true;
            }
            for (i, custom) in state.custom_services(department).iter().enumerate() {
                println!(
                    "[{}] {:<32} {:>24}",
                    i,
                    custom.name,
                    custom.annual_cost.to_string()
                );
                any = true;
            }
            if !any {
                println!("No services selected for {}.", department.title());
            }

            if department.has_license_inventory() {
                println!();
                println!("License contracts:");
                println!("{}", format_license_inventory(state.current_licenses.values()));
            }
            return Ok(());
        }
    };

    apply_to_session(storage, settings, &session, command)?;
    Ok(())
}
