//! CSV Export functionality
//!
//! One row per budget line item, with a total row per department.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Catalog, Department, Money};
use crate::reports::BudgetSummaryReport;
use crate::session::SessionState;

/// Header row of the line item export
pub const CSV_HEADER: [&str; 5] = ["Department", "Section", "Item", "Quantity", "Amount"];

fn plain_amount(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.units().abs(), amount.minor_part())
}

/// Export the line items of a session to CSV
///
/// With `department` set only that department is written; otherwise every
/// department with input.
pub fn export_line_items_csv<W: Write>(
    catalog: &Catalog,
    state: &SessionState,
    department: Option<Department>,
    writer: W,
) -> BudgetResult<()> {
    let report = BudgetSummaryReport::generate(catalog, state, department)?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(CSV_HEADER)?;

    for summary in &report.departments {
        let department = summary.department.to_string();
        for item in &summary.items {
            let section = item.section.to_string();
            let amount = plain_amount(item.amount);
            csv.write_record([
                department.as_str(),
                section.as_str(),
                item.item.as_str(),
                item.detail.as_str(),
                amount.as_str(),
            ])?;
        }
        let total = plain_amount(summary.snapshot.grand_total);
        csv.write_record([department.as_str(), "total", "Grand Total", "", total.as_str()])?;
    }

    csv.flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
