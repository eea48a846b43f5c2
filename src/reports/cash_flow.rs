//! Cash Flow Projection
//!
//! Spreads one department's budget over the twelve months of the fiscal
//! year. Display only: nothing gates on it and totals never come from it.

use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::{Catalog, Department, Money, Timeline, FISCAL_YEAR};
use crate::services::BudgetService;
use crate::session::SessionState;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month in which operational and support costs are billed
const BILLING_MONTH: usize = 11;

/// One month of the projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowMonth {
    pub month: &'static str,
    pub operational: Money,
    pub support: Money,
    pub projects: Money,
}

impl CashFlowMonth {
    fn new(month: &'static str) -> Self {
        Self {
            month,
            operational: Money::zero(),
            support: Money::zero(),
            projects: Money::zero(),
        }
    }

    pub fn total(&self) -> Money {
        self.operational + self.support + self.projects
    }
}

/// Twelve-month projection for one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowProjection {
    pub department: Department,
    pub year: i32,
    pub months: Vec<CashFlowMonth>,
}

impl CashFlowProjection {
    /// Generate the projection for a department
    pub fn generate(
        catalog: &Catalog,
        state: &SessionState,
        department: Department,
    ) -> BudgetResult<Self> {
        let snapshot = BudgetService::new(catalog).snapshot(state, department)?;

        let mut months: Vec<CashFlowMonth> = MONTH_NAMES.iter().map(|m| CashFlowMonth::new(m)).collect();
        months[BILLING_MONTH].operational = snapshot.operational_total;
        months[BILLING_MONTH].support = snapshot.support_total;

        for project in state.projects(department) {
            match project.timeline.closing_month() {
                Some(month) => months[month].projects += project.budget,
                None => {
                    for (month, share) in months.iter_mut().zip(project.budget.split_evenly(12)) {
                        month.projects += share;
                    }
                }
            }
        }

        Ok(Self {
            department,
            year: FISCAL_YEAR,
            months,
        })
    }

    pub fn total(&self) -> Money {
        self.months.iter().map(|m| m.total()).sum()
    }

    /// Running total at the end of each month
    pub fn cumulative(&self) -> Vec<Money> {
        self.months
            .iter()
            .scan(Money::zero(), |acc, m| {
                *acc += m.total();
                Some(*acc)
            })
            .collect()
    }

    /// Project budget per timeline, in timeline order
    pub fn by_timeline(state: &SessionState, department: Department) -> Vec<(Timeline, Money)> {
        Timeline::ALL
            .iter()
            .map(|t| {
                let total = state
                    .projects(department)
                    .iter()
                    .filter(|p| p.timeline == *t)
                    .map(|p| p.budget)
                    .sum();
                (*t, total)
            })
            .collect()
    }

    /// Format the projection for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Cash Flow Projection - {} {}\n",
            self.department, self.year
        ));
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<6} {:>16} {:>16} {:>16} {:>18}\n",
            "Month", "Operational", "Support", "Projects", "Cumulative"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for (month, running) in self.months.iter().zip(self.cumulative()) {
            output.push_str(&format!(
                "{:<6} {:>16} {:>16} {:>16} {:>18}\n",
                month.month,
                month.operational.to_string(),
                month.support.to_string(),
                month.projects.to_string(),
                running.to_string()
            ));
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!("{:<6} {:>70}\n", "TOTAL", self.total().to_string()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImplementationProject;
    use crate::storage::init::default_catalog;

    fn project(timeline: Timeline, budget: Money) -> ImplementationProject {
        ImplementationProject::new("P", "desc", timeline, budget)
    }

    #[test]
    fn test_quarters_land_on_closing_month() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state.implementation_projects.insert(
            Department::Hr,
            vec![
                project(Timeline::Q1, Money::from_units(1_000)),
                project(Timeline::Q3, Money::from_units(3_000)),
            ],
        );
        state
            .support_packages
            .insert(Department::Hr, "Basic".to_string());

        let projection = CashFlowProjection::generate(&catalog, &state, Department::Hr).unwrap();
        assert_eq!(projection.months[2].projects, Money::from_units(1_000));
        assert_eq!(projection.months[8].projects, Money::from_units(3_000));
        assert_eq!(projection.months[11].support, Money::from_units(52_000));
        assert_eq!(projection.total(), Money::from_units(56_000));
        assert_eq!(projection.cumulative()[2], Money::from_units(1_000));
    }

    #[test]
    fn test_multi_quarter_spread_sums_back() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state.implementation_projects.insert(
            Department::Legal,
            vec![project(Timeline::MultiQuarter, Money::from_minor(100_001))],
        );

        let projection = CashFlowProjection::generate(&catalog, &state, Department::Legal).unwrap();
        assert_eq!(projection.total(), Money::from_minor(100_001));
        assert!(projection.months.iter().all(|m| m.projects.is_positive()));
        assert_eq!(projection.months[0].projects, Money::from_minor(8_334));
        assert_eq!(projection.months[11].projects, Money::from_minor(8_333));
    }

    #[test]
    fn test_by_timeline() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state.implementation_projects.insert(
            Department::It,
            vec![
                project(Timeline::Q2, Money::from_units(10)),
                project(Timeline::Q2, Money::from_units(5)),
            ],
        );

        let totals = CashFlowProjection::by_timeline(&state, Department::It);
        assert_eq!(totals.len(), 5);
        assert_eq!(totals[1], (Timeline::Q2, Money::from_units(15)));
    }

    #[test]
    fn test_terminal_format() {
        let catalog = default_catalog();
        let state = SessionState::new(&catalog);
        let projection = CashFlowProjection::generate(&catalog, &state, Department::It).unwrap();
        let output = projection.format_terminal();
        assert!(output.contains("Cash Flow Projection - IT 2025"));
        assert!(output.contains("Dec"));
    }
}
