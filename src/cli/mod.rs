//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the session layer.

pub mod audit;
pub mod budget;
pub mod catalog;
pub mod company;
pub mod export;
pub mod project;
pub mod service;
pub mod session;
pub mod step;
pub mod support;
pub mod terms;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use catalog::{handle_catalog_command, CatalogCommands};
pub use company::{handle_company_command, CompanyCommands};
pub use export::handle_export_command;
pub use project::{handle_project_command, ProjectCommands};
pub use service::{handle_service_command, ServiceCommands};
pub use session::{handle_session_command, SessionCommands};
pub use step::{handle_step_command, StepCommands};
pub use support::{handle_support_command, SupportCommands};
pub use terms::{handle_terms_command, TermsCommands};

use crate::config::settings::Settings;
use crate::display::format_events;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Department, Money};
use crate::session::{Applied, Command, Wizard};
use crate::storage::Storage;

/// Parse a department name or key
pub(crate) fn parse_department(s: &str) -> BudgetResult<Department> {
    Department::parse(s).ok_or_else(|| BudgetError::department_not_found(s))
}

/// Parse a money argument such as "1,500" or "82.50"
pub(crate) fn parse_money(s: &str, field: &str) -> BudgetResult<Money> {
    Money::parse(s).map_err(|e| BudgetError::Validation(format!("Invalid {}: {}", field, e)))
}

/// Apply one command to a saved session, save it and print the events
pub(crate) fn apply_to_session(
    storage: &Storage,
    settings: &Settings,
    session: &str,
    command: Command,
) -> BudgetResult<Applied> {
    let catalog = storage.load_catalog()?;
    let state = storage.sessions.load(session)?;
    let wizard = Wizard::new(&catalog, settings);

    let applied = wizard.apply(&state, &command)?;
    storage.commit(session, &command, &state, &applied.state)?;

    print_events(&applied);
    Ok(applied)
}

pub(crate) fn print_events(applied: &Applied) {
    if !applied.events.is_empty() {
        println!("{}", format_events(&applied.events));
    }
}
