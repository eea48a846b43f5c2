//! Display formatting for terminal output
//!
//! Tables and detail views for the catalog and for sessions.

pub mod catalog;
pub mod session;

pub use catalog::{
    format_department_stats, format_license_inventory, format_package_list, format_service_list,
};
pub use session::{
    format_events, format_project_list, format_snapshot, format_terms_status,
    format_workflow_state,
};
