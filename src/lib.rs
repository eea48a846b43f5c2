//! budget-wizard - Shared services budgeting wizard
//!
//! This library provides the core of a step-by-step budgeting wizard for
//! shared service departments (IT, HR, Legal, Procurement, Facilities &
//! Safety). A user picks operational services, a support package and
//! implementation projects; the wizard prices them, applies license
//! contract constraints, gates progress behind terms acceptance and
//! records submissions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Catalog, selections, licenses, projects, terms and workflow steps
//! - `services`: Pricing, license deltas, terms gate and workflow controller
//! - `session`: Typed session state, commands, events and the `Wizard`
//! - `reports`: Budget summary and cash flow projection
//! - `storage`: JSON file storage for the catalog and sessions
//! - `audit`: Audit logging system
//! - `export`: JSON, YAML and CSV export of a session
//! - `display`, `cli`: Terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_wizard::config::Settings;
//! use budget_wizard::models::Department;
//! use budget_wizard::session::{Command, Wizard};
//! use budget_wizard::storage::default_catalog;
//!
//! let catalog = default_catalog();
//! let settings = Settings::default();
//! let wizard = Wizard::new(&catalog, &settings);
//!
//! let applied = wizard.apply(
//!     &wizard.new_session(),
//!     &Command::SelectSupportPackage {
//!         department: Department::Hr,
//!         package: "Basic".into(),
//!     },
//! )?;
//! let snapshot = wizard.budget_snapshot(&applied.state, Department::Hr)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
