//! Budget CLI commands
//!
//! Summaries, cash flow projection and submission.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::session::{Command, Wizard};
use crate::storage::Storage;

use super::{apply_to_session, parse_department};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show line items and totals
    Summary {
        session: String,
        /// Only this department (default: every department with input)
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Month-by-month cash flow for a department
    Cashflow {
        session: String,
        department: String,
        /// Also show project spend by timeline
        #[arg(long)]
        timeline: bool,
    },

    /// Total over every department
    Total { session: String },

    /// Submit the selected department's budget
    Submit { session: String },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    match cmd {
        BudgetCommands::Summary {
            session,
            department,
        } => {
            let department = department.as_deref().map(parse_department).transpose()?;
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let report = Wizard::new(&catalog, settings).summary(&state, department)?;

            if report.departments.is_empty() {
                println!("Nothing budgeted yet.");
            } else {
                print!("{}", report.format_terminal());
            }
        }

        BudgetCommands::Cashflow {
            session,
            department,
            timeline,
        } => {
            let department = parse_department(&department)?;
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let projection = Wizard::new(&catalog, settings).cash_flow_projection(&state, department)?;
            print!("{}", projection.format_terminal());

            if timeline {
                println!();
                println!("Projects by timeline:");
                for (quarter, amount) in
                    crate::reports::CashFlowProjection::by_timeline(&state, department)
                {
                    println!("  {:<16} {:>16}", quarter.label(), amount.to_string());
                }
            }
        }

        BudgetCommands::Total { session } => {
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let total = Wizard::new(&catalog, settings).total_across_departments(&state)?;
            println!("Operational: {:>18}", total.operational_total.to_string());
            println!("Support:     {:>18}", total.support_total.to_string());
            println!("Projects:    {:>18}", total.project_total.to_string());
            println!("Total:       {:>18}", total.grand_total.to_string());
        }

        BudgetCommands::Submit { session } => {
            apply_to_session(storage, settings, &session, Command::Submit)?;
        }
    }

    Ok(())
}
