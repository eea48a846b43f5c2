//! Session display formatting
//!
//! Workflow position, terms status, projects, snapshots and the events a
//! command produced.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{BudgetSnapshot, Department, ImplementationProject};
use crate::services::{TermsStatusRow, WorkflowState};
use crate::session::DomainEvent;

#[derive(Tabled)]
struct TermsRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Accepted At")]
    accepted_at: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Project")]
    name: String,
    #[tabled(rename = "Timeline")]
    timeline: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Format terms status rows as a table
pub fn format_terms_status(rows: &[TermsStatusRow]) -> String {
    let rows = rows.iter().map(|r| TermsRow {
        slot: r.slot.key(),
        title: r.title.clone(),
        status: r.status.to_string(),
        version: match r.accepted_version {
            Some(v) if v < r.published_version => {
                format!("{} (v{} published)", v, r.published_version)
            }
            Some(v) => v.to_string(),
            None => format!("v{}", r.published_version),
        },
        accepted_at: r
            .accepted_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// Format projects with their positions in the department's list
pub fn format_project_list(projects: &[(usize, &ImplementationProject)]) -> String {
    if projects.is_empty() {
        return "No implementation projects.".to_string();
    }

    let rows = projects.iter().map(|(index, p)| ProjectRow {
        index: *index,
        name: p.name.clone(),
        timeline: p.timeline.label().to_string(),
        priority: p.priority.to_string(),
        budget: p.budget.to_string(),
        category: p.category.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

pub fn format_workflow_state(state: &WorkflowState) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Company:     {}\n",
        if state.company.is_empty() { "-" } else { &state.company }
    ));
    output.push_str(&format!(
        "Department:  {}\n",
        state
            .selected_department
            .map(|d| d.title().to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("Submissions: {}\n\n", state.submissions));

    for (step, open) in &state.steps {
        let marker = if *step == state.current_step {
            ">"
        } else if *open {
            " "
        } else {
            "x"
        };
        output.push_str(&format!(" {} {:>2}. {}\n", marker, step.index() + 1, step.title()));
    }

    if !state.pending_terms.is_empty() {
        output.push_str("\nPending terms:\n");
        for slot in &state.pending_terms {
            output.push_str(&format!("  - {}\n", slot));
        }
    }

    output
}

/// Format a department's totals
pub fn format_snapshot(department: Department, snapshot: &BudgetSnapshot) -> String {
    let mut output = format!("{}\n", department.title());
    output.push_str(&format!("  Operational: {:>18}\n", snapshot.operational_total.to_string()));
    output.push_str(&format!("  Support:     {:>18}\n", snapshot.support_total.to_string()));
    output.push_str(&format!("  Projects:    {:>18}\n", snapshot.project_total.to_string()));
    output.push_str(&format!("  Grand Total: {:>18}\n", snapshot.grand_total.to_string()));
    if snapshot.is_high_value() {
        output.push_str("  High-value budget\n");
    }
    output
}

/// One line per event; blocking events are marked
pub fn format_events(events: &[DomainEvent]) -> String {
    events
        .iter()
        .map(|e| {
            if e.is_blocking() {
                format!("! {}", e)
            } else {
                format!("  {}", e)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Priority, TermsSlot, Timeline, WorkflowStep};

    #[test]
    fn test_project_list() {
        let project = ImplementationProject::new(
            "Vendor onboarding",
            "Automate supplier onboarding",
            Timeline::Q2,
            Money::from_units(45_000),
        )
        .with_priority(Priority::High);
        let output = format_project_list(&[(0, &project)]);

        assert!(output.contains("Vendor onboarding"));
        assert!(output.contains("45,000.00"));
        assert_eq!(format_project_list(&[]), "No implementation projects.");
    }

    #[test]
    fn test_events_mark_blocking() {
        let events = vec![
            DomainEvent::DepartmentSelected {
                department: Department::Hr,
            },
            DomainEvent::TermsDeclined {
                slot: TermsSlot::SystemWide,
            },
        ];
        let output = format_events(&events);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("  Department selected"));
        assert!(lines[1].starts_with("! Declined"));
    }

    #[test]
    fn test_snapshot_high_value() {
        let snapshot = BudgetSnapshot::new(
            Money::from_units(100_001),
            Money::zero(),
            Money::zero(),
        );
        let output = format_snapshot(Department::It, &snapshot);
        assert!(output.contains("100,001.00"));
        assert!(output.contains("High-value"));
    }

    #[test]
    fn test_workflow_state() {
        let state = WorkflowState {
            current_step: WorkflowStep::CompanyInfo,
            selected_department: None,
            company: String::new(),
            steps: vec![
                (WorkflowStep::CompanyInfo, true),
                (WorkflowStep::TermsSystem, false),
            ],
            pending_terms: vec![TermsSlot::SystemWide],
            submissions: 0,
        };
        let output = format_workflow_state(&state);
        assert!(output.contains("Pending terms"));
        assert!(output.contains(" >  1."));
    }
}
