//! Reports module for the budget wizard
//!
//! Provides the per-department budget summary with its line items and the
//! twelve-month cash flow projection.

pub mod cash_flow;
pub mod summary;

pub use cash_flow::{CashFlowMonth, CashFlowProjection};
pub use summary::{BudgetSummaryReport, DepartmentSummary, LineItem, Section};
