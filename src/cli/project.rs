//! Implementation project CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_project_list;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Priority, ProjectPatch, ProjectSort, Timeline};
use crate::services::SelectionService;
use crate::session::{Command, NewProject};
use crate::storage::Storage;

use super::{apply_to_session, parse_department, parse_money};

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Add a project
    Add {
        session: String,
        department: String,
        name: String,
        #[arg(short, long)]
        description: String,
        /// Q1, Q2, Q3, Q4 or multi-quarter
        #[arg(short, long)]
        timeline: String,
        #[arg(short, long)]
        budget: String,
        /// low, medium, high or critical
        #[arg(short, long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long = "type", default_value = "")]
        project_type: String,
        #[arg(long, default_value = "")]
        success_criteria: String,
        /// Linked RPA package
        #[arg(long)]
        rpa_package: Option<String>,
    },

    /// Change fields of a project
    Update {
        session: String,
        department: String,
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        timeline: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove a project by position
    Remove {
        session: String,
        department: String,
        index: usize,
    },

    /// List projects
    List {
        session: String,
        department: String,
        /// budget, priority or timeline
        #[arg(short, long)]
        sort: Option<String>,
    },
}

fn parse_timeline(s: &str) -> BudgetResult<Timeline> {
    Timeline::parse(s).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid timeline '{}': use Q1, Q2, Q3, Q4 or multi-quarter",
            s
        ))
    })
}

fn parse_priority(s: &str) -> BudgetResult<Priority> {
    Priority::parse(s).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid priority '{}': use low, medium, high or critical",
            s
        ))
    })
}

/// Handle a project command
pub fn handle_project_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ProjectCommands,
) -> BudgetResult<()> {
    let (session, command) = match cmd {
        ProjectCommands::Add {
            session,
            department,
            name,
            description,
            timeline,
            budget,
            priority,
            category,
            project_type,
            success_criteria,
            rpa_package,
        } => (
            session,
            Command::AddProject {
                department: parse_department(&department)?,
                project: NewProject {
                    name,
                    description,
                    timeline: parse_timeline(&timeline)?,
                    budget: parse_money(&budget, "budget")?,
                    priority: parse_priority(&priority)?,
                    category,
                    project_type,
                    success_criteria,
                    rpa_package,
                },
            },
        ),
        ProjectCommands::Update {
            session,
            department,
            index,
            name,
            description,
            timeline,
            budget,
            priority,
            category,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                category,
                timeline: timeline.as_deref().map(parse_timeline).transpose()?,
                budget: budget
                    .as_deref()
                    .map(|b| parse_money(b, "budget"))
                    .transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..ProjectPatch::default()
            };
            if patch.is_empty() {
                return Err(BudgetError::Validation("Nothing to update".into()));
            }
            (
                session,
                Command::UpdateProject {
                    department: parse_department(&department)?,
                    index,
                    patch,
                },
            )
        }
        ProjectCommands::Remove {
            session,
            department,
            index,
        } => (
            session,
            Command::RemoveProject {
                department: parse_department(&department)?,
                index,
            },
        ),
        ProjectCommands::List {
            session,
            department,
            sort,
        } => {
            let department = parse_department(&department)?;
            let sort = sort
                .as_deref()
                .map(|s| {
                    ProjectSort::parse(s).ok_or_else(|| {
                        BudgetError::Validation(format!(
                            "Invalid sort '{}': use budget, priority or timeline",
                            s
                        ))
                    })
                })
                .transpose()?;

            let catalog = storage.load_catalog()?;
            let state = storage.sessions.load(&session)?;
            let selection = SelectionService::new(&catalog, settings.license_reduction_policy);
            let projects = selection.sorted_projects(&state, department, sort);
            println!("{}", format_project_list(&projects));
            return Ok(());
        }
    };

    apply_to_session(storage, settings, &session, command)?;
    Ok(())
}
