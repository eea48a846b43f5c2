//! Service layer for the budget wizard
//!
//! The service layer holds the business rules on top of the models:
//! cost resolution, budget totals, terms gating, navigation and catalog
//! administration. Services borrow the catalog and operate on a
//! `SessionState` passed in by the caller.

pub mod budget;
pub mod catalog;
pub mod license;
pub mod selection;
pub mod terms;
pub mod workflow;

pub use budget::BudgetService;
pub use catalog::{department_stats, CatalogService, DepartmentStats};
pub use license::{net_new_cost, LicenseResolver, ResolvedCost};
pub use selection::{SelectOutcome, SelectionService};
pub use terms::{TermsService, TermsStatusRow};
pub use workflow::{Navigation, Redirect, WorkflowService, WorkflowState};
