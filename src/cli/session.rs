//! Session CLI commands
//!
//! Create, inspect and delete named sessions, and apply a file of commands
//! to one in a single all-or-nothing batch.

use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::audit::Operation;
use crate::config::settings::Settings;
use crate::display::{format_snapshot, format_workflow_state};
use crate::error::{BudgetError, BudgetResult};
use crate::session::{Applied, Command, Wizard};
use crate::storage::file_io::read_json_required;
use crate::storage::Storage;

use super::print_events;

/// Session subcommands
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a new session
    New {
        /// Session name (letters, digits, '-' and '_')
        name: String,
        /// Replace an existing session of the same name
        #[arg(long)]
        force: bool,
    },

    /// List saved sessions
    List,

    /// Show where a session stands
    Show {
        name: String,
        /// Print the session document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a JSON array of commands; nothing is saved if any fails
    Apply {
        name: String,
        /// Path to the commands file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a session
    Delete { name: String },
}

/// Handle a session command
pub fn handle_session_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SessionCommands,
) -> BudgetResult<()> {
    match cmd {
        SessionCommands::New { name, force } => {
            if storage.sessions.exists(&name) && !force {
                return Err(BudgetError::Duplicate {
                    entity_type: "Session",
                    identifier: name,
                });
            }

            let catalog = storage.load_catalog()?;
            let state = Wizard::new(&catalog, settings).new_session();
            storage.sessions.save(&name, &state)?;
            storage.log_session(&name, Operation::Create, &state)?;

            info!(session = %name, "session created");
            println!("Created session '{}'", name);
            println!("Next: budget-wizard company set {} --company <NAME> ...", name);
        }

        SessionCommands::List => {
            let names = storage.sessions.list()?;
            if names.is_empty() {
                println!("No sessions found.");
                println!();
                println!("Use 'budget-wizard session new <name>' to start one.");
            } else {
                for name in &names {
                    println!("{}", name);
                }
            }
        }

        SessionCommands::Show { name, json } => {
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&name)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
                return Ok(());
            }

            let wizard = Wizard::new(&catalog, settings);
            println!("Session: {}", name);
            println!("{}", "=".repeat(40));
            print!("{}", format_workflow_state(&wizard.workflow_state(&state)));

            for department in state.active_departments() {
                println!();
                let snapshot = wizard.budget_snapshot(&state, department)?;
                print!("{}", format_snapshot(department, &snapshot));
            }

            for submission in &state.submissions {
                println!();
                println!(
                    "Submitted {} on {}: {}",
                    submission.reference_id,
                    submission.submitted_at.format("%Y-%m-%d %H:%M"),
                    submission.grand_total
                );
            }
        }

        SessionCommands::Apply { name, file } => {
            let commands: Vec<Command> = read_json_required(&file)?;
            if commands.is_empty() {
                println!("No commands in {}", file.display());
                return Ok(());
            }

            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&name)?;
            let wizard = Wizard::new(&catalog, settings);

            let mut current = state.clone();
            let mut events = Vec::new();
            let mut steps = Vec::with_capacity(commands.len());
            for (i, command) in commands.iter().enumerate() {
                let applied = wizard.apply(&current, command).map_err(|e| {
                    BudgetError::Validation(format!(
                        "command {} ({}) failed: {}; nothing was applied",
                        i + 1,
                        command.describe(),
                        e
                    ))
                })?;
                steps.push((command, current, applied.state.clone()));
                current = applied.state;
                events.extend(applied.events);
            }

            storage.sessions.save(&name, &current)?;
            for (command, before, after) in &steps {
                storage.log_command(&name, command, before, after)?;
            }

            print_events(&Applied {
                state: current,
                events,
            });
            println!("Applied {} command(s) to '{}'", commands.len(), name);
        }

        SessionCommands::Delete { name } => {
            let state = storage.sessions.load(&name)?;
            storage.sessions.delete(&name)?;
            storage.log_session(&name, Operation::Delete, &state)?;
            println!("Deleted session '{}'", name);
        }
    }

    Ok(())
}
