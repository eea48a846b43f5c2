//! Budget Summary Report
//!
//! Line items behind each department's totals: selected services, custom
//! services, the support package with its extras, and projects.

use serde::Serialize;
use std::fmt;

use crate::error::BudgetResult;
use crate::models::{
    BudgetSnapshot, Catalog, Department, Money, EXTRA_REPORT_PRICE, EXTRA_SUPPORT_REQUEST_PRICE,
    EXTRA_TRAINING_SESSION_PRICE,
};
use crate::services::BudgetService;
use crate::session::SessionState;

/// Which part of the budget a line item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Operational,
    Custom,
    Support,
    Project,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Operational => "operational",
            Self::Custom => "custom",
            Self::Support => "support",
            Self::Project => "project",
        };
        write!(f, "{}", label)
    }
}

/// One priced line of a department budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub section: Section,
    pub item: String,
    /// Quantity, or a short qualifier such as a project timeline
    pub detail: String,
    pub amount: Money,
}

impl LineItem {
    fn new(section: Section, item: impl Into<String>, detail: impl Into<String>, amount: Money) -> Self {
        Self {
            section,
            item: item.into(),
            detail: detail.into(),
            amount,
        }
    }
}

/// Summary of one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub department: Department,
    pub items: Vec<LineItem>,
    pub snapshot: BudgetSnapshot,
}

impl DepartmentSummary {
    pub fn items_in(&self, section: Section) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(move |i| i.section == section)
    }
}

/// Budget Summary Report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummaryReport {
    pub company: String,
    pub departments: Vec<DepartmentSummary>,
    /// Sum over every department, for reporting only
    pub totals: BudgetSnapshot,
}

impl BudgetSummaryReport {
    /// Generate the report for one department, or every department with input
    pub fn generate(
        catalog: &Catalog,
        state: &SessionState,
        department: Option<Department>,
    ) -> BudgetResult<Self> {
        let departments = match department {
            Some(d) => vec![d],
            None => state.active_departments(),
        };

        let summaries = departments
            .into_iter()
            .map(|d| summarize(catalog, state, d))
            .collect::<BudgetResult<Vec<_>>>()?;
        let totals = summaries.iter().map(|s| s.snapshot).sum();

        Ok(Self {
            company: state.company_info.company.clone(),
            departments: summaries,
            totals,
        })
    }

    pub fn is_high_value(&self) -> bool {
        self.departments.iter().any(|d| d.snapshot.is_high_value())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let title = if self.company.is_empty() {
            "Budget Summary".to_string()
        } else {
            format!("Budget Summary - {}", self.company)
        };
        output.push_str(&title);
        output.push('\n');
        output.push_str(&"=".repeat(80));
        output.push('\n');

        for summary in &self.departments {
            output.push_str(&format!("\n{}\n", summary.department.title().to_uppercase()));

            for item in &summary.items {
                output.push_str(&format!(
                    "  {:<12} {:<36} {:>10} {:>16}\n",
                    item.section.to_string(),
                    item.item,
                    item.detail,
                    item.amount.to_string()
                ));
            }

            let s = &summary.snapshot;
            output.push_str(&format!("  {:<50} {:>26}\n", "Operational:", s.operational_total.to_string()));
            output.push_str(&format!("  {:<50} {:>26}\n", "Support:", s.support_total.to_string()));
            output.push_str(&format!("  {:<50} {:>26}\n", "Projects:", s.project_total.to_string()));
            output.push_str(&format!("  {:<50} {:>26}\n", "Grand Total:", s.grand_total.to_string()));
            if s.is_high_value() {
                output.push_str("  * High-value budget: high-value terms required\n");
            }
        }

        if self.departments.len() > 1 {
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<52} {:>26}\n",
                "ALL DEPARTMENTS",
                self.totals.grand_total.to_string()
            ));
        }

        output
    }
}

fn summarize(
    catalog: &Catalog,
    state: &SessionState,
    department: Department,
) -> BudgetResult<DepartmentSummary> {
    let budget = BudgetService::new(catalog);
    let mut items = Vec::new();

    for selection in state.selections(department).filter(|s| s.selected) {
        let service = catalog.service(department, &selection.service_key)?;
        items.push(LineItem::new(
            Section::Operational,
            service.name.clone(),
            selection.requested_quantity.to_string(),
            selection.computed_annual_cost,
        ));
    }

    for custom in state.custom_services(department) {
        items.push(LineItem::new(Section::Custom, custom.name.clone(), "", custom.annual_cost));
    }

    if let Some(package) = budget.selected_package(state, department)? {
        items.push(LineItem::new(
            Section::Support,
            format!("{} package", package.name),
            "1",
            package.price,
        ));
    }

    let extras = state.support_extras(department);
    for (label, count, price) in [
        ("Extra support requests", extras.extra_support_requests, EXTRA_SUPPORT_REQUEST_PRICE),
        ("Extra training sessions", extras.extra_training_sessions, EXTRA_TRAINING_SESSION_PRICE),
        ("Extra reports", extras.extra_reports, EXTRA_REPORT_PRICE),
    ] {
        if count > 0 {
            items.push(LineItem::new(
                Section::Support,
                label,
                count.to_string(),
                price.times(i64::from(count)),
            ));
        }
    }

    for project in state.projects(department) {
        items.push(LineItem::new(
            Section::Project,
            project.name.clone(),
            project.timeline.label(),
            project.budget,
        ));
    }

    Ok(DepartmentSummary {
        department,
        items,
        snapshot: budget.snapshot(state, department)?,
    })
}
