//! Company information CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::CompanyInfo;
use crate::session::Command;
use crate::storage::Storage;

use super::apply_to_session;

/// Company subcommands
#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Set the requesting company details
    Set {
        /// Session name
        session: String,
        /// Company name (one of the catalog's companies)
        #[arg(long)]
        company: String,
        /// Requesting department within the company
        #[arg(long)]
        department: String,
        /// Contact person
        #[arg(long)]
        contact: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
    },

    /// List the companies the catalog accepts
    List,
}

/// Handle a company command
pub fn handle_company_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CompanyCommands,
) -> BudgetResult<()> {
    match cmd {
        CompanyCommands::Set {
            session,
            company,
            department,
            contact,
            email,
            phone,
        } => {
            let mut info = CompanyInfo::new(company, department, contact, email);
            if let Some(phone) = phone {
                info.phone = phone;
            }
            apply_to_session(storage, settings, &session, Command::SetCompanyInfo { info })?;
        }

        CompanyCommands::List => {
            let catalog = storage.load_catalog()?;
            if catalog.companies.is_empty() {
                println!("Any company name is accepted.");
            } else {
                for company in &catalog.companies {
                    println!("{}", company);
                }
            }
        }
    }

    Ok(())
}
