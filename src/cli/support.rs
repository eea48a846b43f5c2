//! Support package CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_package_list;
use crate::error::BudgetResult;
use crate::models::SupportExtras;
use crate::session::Command;
use crate::storage::Storage;

use super::{apply_to_session, parse_department};

/// Support subcommands
#[derive(Subcommand)]
pub enum SupportCommands {
    /// List the packages a department can choose
    Packages { department: String },

    /// Select a support package
    Select {
        session: String,
        department: String,
        package: String,
    },

    /// Remove the selected package
    Clear { session: String, department: String },

    /// Set additional support purchased beyond the package
    Extras {
        session: String,
        department: String,
        #[arg(long, default_value_t = 0)]
        requests: u32,
        #[arg(long, default_value_t = 0)]
        training: u32,
        #[arg(long, default_value_t = 0)]
        reports: u32,
    },
}

/// Handle a support command
pub fn handle_support_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SupportCommands,
) -> BudgetResult<()> {
    let (session, command) = match cmd {
        SupportCommands::Packages { department } => {
            let department = parse_department(&department)?;
            let catalog = storage.load_catalog()?;
            let packages: Vec<_> = catalog
                .packages_for(department)
                .into_iter()
                .cloned()
                .collect();
            println!("{}", format_package_list(&packages));
            return Ok(());
        }
        SupportCommands::Select {
            session,
            department,
            package,
        } => (
            session,
            Command::SelectSupportPackage {
                department: parse_department(&department)?,
                package,
            },
        ),
        SupportCommands::Clear {
            session,
            department,
        } => (
            session,
            Command::ClearSupportPackage {
                department: parse_department(&department)?,
            },
        ),
        SupportCommands::Extras {
            session,
            department,
            requests,
            training,
            reports,
        } => (
            session,
            Command::SetSupportExtras {
                department: parse_department(&department)?,
                extras: SupportExtras::new(requests, training, reports),
            },
        ),
    };

    apply_to_session(storage, settings, &session, command)?;
    Ok(())
}
