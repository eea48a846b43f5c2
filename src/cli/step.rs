//! Workflow navigation CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_workflow_state;
use crate::error::{BudgetError, BudgetResult};
use crate::models::WorkflowStep;
use crate::session::{Command, Wizard};
use crate::storage::Storage;

use super::{apply_to_session, parse_department};

/// Step subcommands
#[derive(Subcommand)]
pub enum StepCommands {
    /// Show the current step and which steps are open
    Show { session: String },

    /// Go to a step (redirects if it is not open yet)
    Go {
        session: String,
        /// Step key, e.g. services or terms_system
        step: String,
    },

    /// Go to the next step
    Next { session: String },

    /// Go back one step
    Previous { session: String },

    /// Choose the department to budget for
    Department { session: String, department: String },

    /// Start over on another department, keeping company and system terms
    #[command(name = "new-department")]
    NewDepartment { session: String },
}

/// Handle a step command
pub fn handle_step_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StepCommands,
) -> BudgetResult<()> {
    let (session, command) = match cmd {
        StepCommands::Show { session } => {
            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let workflow = Wizard::new(&catalog, settings).workflow_state(&state);
            print!("{}", format_workflow_state(&workflow));
            return Ok(());
        }
        StepCommands::Go { session, step } => {
            let target = WorkflowStep::parse(&step).ok_or_else(|| {
                BudgetError::Validation(format!(
                    "Unknown step '{}'; steps are: {}",
                    step,
                    WorkflowStep::ALL
                        .iter()
                        .map(|s| s.key())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            (session, Command::AdvanceStep { target })
        }
        StepCommands::Next { session } => (session, Command::NextStep),
        StepCommands::Previous { session } => (session, Command::PreviousStep),
        StepCommands::Department {
            session,
            department,
        } => (
            session,
            Command::SelectDepartment {
                department: parse_department(&department)?,
            },
        ),
        StepCommands::NewDepartment { session } => (session, Command::StartNewDepartment),
    };

    let applied = apply_to_session(storage, settings, &session, command)?;
    println!("Current step: {}", applied.state.current_step.title());
    Ok(())
}
