//! Session commands
//!
//! Every input a user can give the wizard, as data. Commands can be read
//! from a JSON file (`session apply`), where money amounts are minor units.

use serde::{Deserialize, Serialize};

use crate::audit::{EntityType, Operation};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    CompanyInfo, Department, ImplementationProject, Money, Priority, ProjectPatch, SupportExtras,
    TermsSlot, Timeline, WorkflowStep,
};

/// Kind of terms slot named by a command; department slots take the
/// department from the command or from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsKind {
    SystemWide,
    Department,
    HighValue,
    BudgetSubmission,
}

impl TermsKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "system_wide" | "system" => Some(Self::SystemWide),
            "department" | "dept" => Some(Self::Department),
            "high_value" => Some(Self::HighValue),
            "budget_submission" | "submission" => Some(Self::BudgetSubmission),
            _ => None,
        }
    }

    /// Resolve to a concrete slot
    pub fn slot(
        &self,
        department: Option<Department>,
        selected: Option<Department>,
    ) -> BudgetResult<TermsSlot> {
        Ok(match self {
            Self::SystemWide => TermsSlot::SystemWide,
            Self::HighValue => TermsSlot::HighValue,
            Self::BudgetSubmission => TermsSlot::BudgetSubmission,
            Self::Department => TermsSlot::Department(department.or(selected).ok_or_else(|| {
                BudgetError::Validation("Department terms need a department".into())
            })?),
        })
    }
}

impl From<TermsSlot> for TermsKind {
    fn from(slot: TermsSlot) -> Self {
        match slot {
            TermsSlot::SystemWide => Self::SystemWide,
            TermsSlot::Department(_) => Self::Department,
            TermsSlot::HighValue => Self::HighValue,
            TermsSlot::BudgetSubmission => Self::BudgetSubmission,
        }
    }
}

/// Project fields as entered; ID and creation date are assigned on add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub timeline: Timeline,
    pub budget: Money,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub project_type: String,
    #[serde(default)]
    pub success_criteria: String,
    #[serde(default)]
    pub rpa_package: Option<String>,
}

impl NewProject {
    pub fn into_project(self) -> ImplementationProject {
        let mut project =
            ImplementationProject::new(self.name, self.description, self.timeline, self.budget)
                .with_priority(self.priority)
                .with_category(self.category);
        project.project_type = self.project_type;
        project.success_criteria = self.success_criteria;
        project.rpa_package = self.rpa_package.filter(|p| !p.trim().is_empty());
        project
    }
}

/// One user input to the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SetCompanyInfo {
        info: CompanyInfo,
    },
    SelectDepartment {
        department: Department,
    },
    AdvanceStep {
        target: WorkflowStep,
    },
    NextStep,
    PreviousStep,
    StartNewDepartment,
    AcceptTerms {
        slot: TermsKind,
        #[serde(default)]
        department: Option<Department>,
        #[serde(default)]
        version: Option<u32>,
    },
    DeclineTerms {
        slot: TermsKind,
        #[serde(default)]
        department: Option<Department>,
    },
    SelectService {
        department: Department,
        service: String,
        quantity: u32,
        #[serde(default)]
        is_new: bool,
    },
    DeselectService {
        department: Department,
        service: String,
    },
    AddCustomService {
        department: Department,
        name: String,
        description: String,
        /// Recurring yearly amount, setup excluded
        recurring_cost: Money,
        #[serde(default)]
        setup_cost: Money,
    },
    RemoveCustomService {
        department: Department,
        index: usize,
    },
    SelectSupportPackage {
        department: Department,
        package: String,
    },
    ClearSupportPackage {
        department: Department,
    },
    SetSupportExtras {
        department: Department,
        extras: SupportExtras,
    },
    AddProject {
        department: Department,
        project: NewProject,
    },
    UpdateProject {
        department: Department,
        index: usize,
        patch: ProjectPatch,
    },
    RemoveProject {
        department: Department,
        index: usize,
    },
    Submit,
}

impl Command {
    /// Department whose budget the command edits, if any
    pub fn department(&self) -> Option<Department> {
        match self {
            Self::SelectService { department, .. }
            | Self::DeselectService { department, .. }
            | Self::AddCustomService { department, .. }
            | Self::RemoveCustomService { department, .. }
            | Self::SelectSupportPackage { department, .. }
            | Self::ClearSupportPackage { department }
            | Self::SetSupportExtras { department, .. }
            | Self::AddProject { department, .. }
            | Self::UpdateProject { department, .. }
            | Self::RemoveProject { department, .. }
            | Self::SelectDepartment { department } => Some(*department),
            _ => None,
        }
    }

    /// Whether the command edits budget inputs
    pub fn changes_budget(&self) -> bool {
        self.entity_type() != EntityType::Workflow
            && self.entity_type() != EntityType::Terms
            && self.department().is_some()
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::SelectService { .. } | Self::DeselectService { .. } => {
                EntityType::ServiceSelection
            }
            Self::AddCustomService { .. } | Self::RemoveCustomService { .. } => {
                EntityType::CustomService
            }
            Self::SelectSupportPackage { .. }
            | Self::ClearSupportPackage { .. }
            | Self::SetSupportExtras { .. } => EntityType::SupportPackage,
            Self::AddProject { .. } | Self::UpdateProject { .. } | Self::RemoveProject { .. } => {
                EntityType::Project
            }
            Self::AcceptTerms { .. } | Self::DeclineTerms { .. } => EntityType::Terms,
            Self::SetCompanyInfo { .. } => EntityType::Session,
            Self::SelectDepartment { .. }
            | Self::AdvanceStep { .. }
            | Self::NextStep
            | Self::PreviousStep
            | Self::StartNewDepartment
            | Self::Submit => EntityType::Workflow,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::AddCustomService { .. } | Self::AddProject { .. } => Operation::Create,
            Self::RemoveCustomService { .. }
            | Self::RemoveProject { .. }
            | Self::ClearSupportPackage { .. }
            | Self::DeselectService { .. } => Operation::Delete,
            Self::Submit => Operation::Submit,
            _ => Operation::Update,
        }
    }

    /// Identifier of the touched entity, for the audit log
    pub fn entity_id(&self) -> String {
        match self {
            Self::SelectService {
                department,
                service,
                ..
            }
            | Self::DeselectService {
                department,
                service,
            } => format!("{}/{}", department, service),
            Self::RemoveCustomService { department, index }
            | Self::UpdateProject {
                department, index, ..
            }
            | Self::RemoveProject { department, index } => format!("{}/{}", department, index),
            Self::AcceptTerms { slot, department, .. } | Self::DeclineTerms { slot, department } => {
                match department {
                    Some(d) => format!("{:?}/{}", slot, d),
                    None => format!("{:?}", slot),
                }
            }
            other => other
                .department()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "session".to_string()),
        }
    }

    /// Short human-readable description
    pub fn describe(&self) -> String {
        match self {
            Self::SetCompanyInfo { info } => format!("set company info ({})", info.company),
            Self::SelectDepartment { department } => format!("select department {}", department),
            Self::AdvanceStep { target } => format!("go to {}", target),
            Self::NextStep => "next step".to_string(),
            Self::PreviousStep => "previous step".to_string(),
            Self::StartNewDepartment => "start new department".to_string(),
            Self::AcceptTerms { slot, .. } => format!("accept {:?} terms", slot),
            Self::DeclineTerms { slot, .. } => format!("decline {:?} terms", slot),
            Self::SelectService {
                service, quantity, ..
            } => format!("select {} x{}", service, quantity),
            Self::DeselectService { service, .. } => format!("deselect {}", service),
            Self::AddCustomService { name, .. } => format!("add custom service {}", name),
            Self::RemoveCustomService { index, .. } => format!("remove custom service #{}", index),
            Self::SelectSupportPackage { package, .. } => {
                format!("select support package {}", package)
            }
            Self::ClearSupportPackage { .. } => "clear support package".to_string(),
            Self::SetSupportExtras { extras, .. } => format!(
                "set support extras ({}/{}/{})",
                extras.extra_support_requests, extras.extra_training_sessions, extras.extra_reports
            ),
            Self::AddProject { project, .. } => format!("add project {}", project.name),
            Self::UpdateProject { index, .. } => format!("update project #{}", index),
            Self::RemoveProject { index, .. } => format!("remove project #{}", index),
            Self::Submit => "submit budget".to_string(),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_file_format() {
        let json = r#"[
            {"op": "select_service", "department": "IT", "service": "Microsoft 365 E3", "quantity": 170},
            {"op": "accept_terms", "slot": "department", "department": "IT"},
            {"op": "advance_step", "target": "services"},
            {"op": "set_support_extras", "department": "IT",
             "extras": {"extra_support_requests": 2, "extra_training_sessions": 1}},
            {"op": "submit"}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();

        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            Command::SelectService {
                department: Department::It,
                service: "Microsoft 365 E3".into(),
                quantity: 170,
                is_new: false,
            }
        );
        assert!(matches!(
            commands[1],
            Command::AcceptTerms {
                slot: TermsKind::Department,
                department: Some(Department::It),
                version: None
            }
        ));
        assert_eq!(commands[4], Command::Submit);
    }

    #[test]
    fn test_terms_kind_resolution() {
        assert_eq!(
            TermsKind::Department
                .slot(None, Some(Department::Legal))
                .unwrap(),
            TermsSlot::Department(Department::Legal)
        );
        assert_eq!(
            TermsKind::Department
                .slot(Some(Department::Hr), Some(Department::Legal))
                .unwrap(),
            TermsSlot::Department(Department::Hr)
        );
        assert!(TermsKind::Department.slot(None, None).unwrap_err().is_validation());
        assert_eq!(TermsKind::parse("high-value"), Some(TermsKind::HighValue));
    }

    #[test]
    fn test_audit_metadata() {
        let command = Command::RemoveProject {
            department: Department::Procurement,
            index: 2,
        };
        assert_eq!(command.entity_type(), EntityType::Project);
        assert_eq!(command.operation(), Operation::Delete);
        assert_eq!(command.entity_id(), "Procurement/2");
        assert!(command.changes_budget());

        assert_eq!(Command::Submit.entity_id(), "session");
        assert!(!Command::Submit.changes_budget());
        assert!(!Command::SelectDepartment {
            department: Department::Hr
        }
        .changes_budget());
    }

    #[test]
    fn test_new_project_drops_empty_rpa() {
        let project = NewProject {
            name: "Portal".into(),
            description: "Supplier portal".into(),
            timeline: Timeline::Q2,
            budget: Money::from_units(10_000),
            priority: Priority::High,
            category: String::new(),
            project_type: String::new(),
            success_criteria: String::new(),
            rpa_package: Some(" ".into()),
        }
        .into_project();
        assert!(project.rpa_package.is_none());
        assert_eq!(project.priority, Priority::High);
    }
}
