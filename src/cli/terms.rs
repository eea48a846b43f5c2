//! Terms CLI commands
//!
//! Status, reading, acceptance and declining of terms slots.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_terms_status;
use crate::error::{BudgetError, BudgetResult};
use crate::session::{Command, TermsKind, Wizard};
use crate::storage::Storage;

use super::{apply_to_session, parse_department};

/// Terms subcommands
#[derive(Subcommand)]
pub enum TermsCommands {
    /// Show every terms slot of a session
    Status { session: String },

    /// Print the text of a terms document
    Show {
        session: String,
        /// system-wide, department, high-value or submission
        slot: String,
        /// Department for department terms (defaults to the session's)
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Accept terms
    Accept {
        session: String,
        /// system-wide, department, high-value or submission
        slot: String,
        #[arg(short, long)]
        department: Option<String>,
        /// Version being accepted (defaults to the published one)
        #[arg(long)]
        version: Option<u32>,
    },

    /// Decline presented terms
    Decline {
        session: String,
        slot: String,
        #[arg(short, long)]
        department: Option<String>,
    },
}

fn parse_kind(s: &str) -> BudgetResult<TermsKind> {
    TermsKind::parse(s).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Unknown terms slot '{}': use system-wide, department, high-value or submission",
            s
        ))
    })
}

/// Handle a terms command
pub fn handle_terms_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TermsCommands,
) -> BudgetResult<()> {
    match cmd {
        TermsCommands::Status { session } => {
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let rows = Wizard::new(&catalog, settings).terms_status(&state);
            println!("{}", format_terms_status(&rows));
        }

        TermsCommands::Show {
            session,
            slot,
            department,
        } => {
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let department = department.as_deref().map(parse_department).transpose()?;
            let slot = parse_kind(&slot)?.slot(department, state.selected_department)?;

            match catalog.terms_for(&slot) {
                Some(document) => {
                    println!("{} (version {})", document.title, document.version);
                    println!("{}", "-".repeat(60));
                    println!("{}", document.content);
                }
                None => println!("No document published for {}.", slot),
            }
        }

        TermsCommands::Accept {
            session,
            slot,
            department,
            version,
        } => {
            let command = Command::AcceptTerms {
                slot: parse_kind(&slot)?,
                department: department.as_deref().map(parse_department).transpose()?,
                version,
            };
            apply_to_session(storage, settings, &session, command)?;
        }

        TermsCommands::Decline {
            session,
            slot,
            department,
        } => {
            let command = Command::DeclineTerms {
                slot: parse_kind(&slot)?,
                department: department.as_deref().map(parse_department).transpose()?,
            };
            apply_to_session(storage, settings, &session, command)?;
        }
    }

    Ok(())
}
