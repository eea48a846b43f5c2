use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_wizard::cli::{
    handle_audit_command, handle_budget_command, handle_catalog_command, handle_company_command,
    handle_export_command, handle_project_command, handle_service_command,
    handle_session_command, handle_step_command, handle_support_command, handle_terms_command,
};
use budget_wizard::config::{paths::WizardPaths, settings::Settings, LicenseReductionPolicy};
use budget_wizard::logging::init_logger;
use budget_wizard::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budget-wizard",
    version,
    about = "Shared services budgeting wizard",
    long_about = "Builds a department's annual shared services budget step by step: \
                  operational services, support packages and implementation projects, \
                  with license contract checks and terms acceptance before submission."
)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with the default catalog
    Init,

    /// Show current configuration and paths, or change a setting
    Config {
        /// License reduction policy: reject or clamp
        #[arg(long)]
        license_policy: Option<String>,
        /// Currency symbol shown before amounts
        #[arg(long)]
        currency: Option<String>,
        /// Turn audit logging on or off
        #[arg(long)]
        audit: Option<bool>,
    },

    /// Browse and edit the service catalog
    #[command(subcommand)]
    Catalog(budget_wizard::cli::CatalogCommands),

    /// Manage sessions
    #[command(subcommand)]
    Session(budget_wizard::cli::SessionCommands),

    /// Requesting company details
    #[command(subcommand)]
    Company(budget_wizard::cli::CompanyCommands),

    /// Terms status and acceptance
    #[command(subcommand)]
    Terms(budget_wizard::cli::TermsCommands),

    /// Move through the wizard steps
    #[command(subcommand)]
    Step(budget_wizard::cli::StepCommands),

    /// Operational services
    #[command(subcommand)]
    Service(budget_wizard::cli::ServiceCommands),

    /// Support packages and extras
    #[command(subcommand)]
    Support(budget_wizard::cli::SupportCommands),

    /// Implementation projects
    #[command(subcommand)]
    Project(budget_wizard::cli::ProjectCommands),

    /// Totals, cash flow and submission
    #[command(subcommand)]
    Budget(budget_wizard::cli::BudgetCommands),

    /// Export a session
    Export {
        session: String,
        /// json, yaml or csv
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only this department (csv)
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Show the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
        /// Only entries of this session
        #[arg(short, long)]
        session: Option<String>,
        /// Include before/after values
        #[arg(long)]
        details: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.log_json);

    let paths = WizardPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing budget wizard at: {}", paths.base_dir().display());
            budget_wizard::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'budget-wizard catalog list' to see the service catalog.");
            println!("Run 'budget-wizard session new <name>' to start a budget.");
        }
        Some(Commands::Config {
            license_policy,
            currency,
            audit,
        }) => {
            let changed = license_policy.is_some() || currency.is_some() || audit.is_some();
            if let Some(policy) = license_policy {
                settings.license_reduction_policy = LicenseReductionPolicy::parse(&policy)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Unknown license policy '{}': use reject or clamp", policy)
                    })?;
            }
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(audit) = audit {
                settings.audit_enabled = audit;
            }
            if changed {
                settings.save(&paths)?;
            }

            println!("Budget Wizard Configuration");
            println!("===========================");
            println!("Base directory:     {}", paths.base_dir().display());
            println!("Sessions directory: {}", paths.sessions_dir().display());
            println!("Catalog file:       {}", paths.catalog_file().display());
            println!("Audit log:          {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:                 {}", settings.currency_symbol);
            println!("  License reduction policy: {}", settings.license_reduction_policy);
            println!("  Terms version:            {}", settings.terms_version);
            println!("  Audit enabled:            {}", settings.audit_enabled);
        }
        Some(Commands::Catalog(cmd)) => handle_catalog_command(&storage, cmd)?,
        Some(Commands::Session(cmd)) => handle_session_command(&storage, &settings, cmd)?,
        Some(Commands::Company(cmd)) => handle_company_command(&storage, &settings, cmd)?,
        Some(Commands::Terms(cmd)) => handle_terms_command(&storage, &settings, cmd)?,
        Some(Commands::Step(cmd)) => handle_step_command(&storage, &settings, cmd)?,
        Some(Commands::Service(cmd)) => handle_service_command(&storage, &settings, cmd)?,
        Some(Commands::Support(cmd)) => handle_support_command(&storage, &settings, cmd)?,
        Some(Commands::Project(cmd)) => handle_project_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Export {
            session,
            format,
            output,
            department,
        }) => handle_export_command(&storage, &session, &format, output, department)?,
        Some(Commands::Audit {
            count,
            session,
            details,
        }) => handle_audit_command(&storage, count, session, details)?,
        None => {
            println!("budget-wizard - Shared services budgeting wizard");
            println!();
            println!("Run 'budget-wizard --help' for usage information.");
        }
    }

    Ok(())
}
