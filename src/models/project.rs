//! Implementation project model
//!
//! User-managed projects per department. Budgets count fully toward the
//! project total; the timeline only shapes the cash-flow projection.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::ids::ProjectId;
use super::money::{Money, MAX_AMOUNT};

/// When a project lands in the fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "Q1 2025")]
    Q1,
    #[serde(rename = "Q2 2025")]
    Q2,
    #[serde(rename = "Q3 2025")]
    Q3,
    #[serde(rename = "Q4 2025")]
    Q4,
    #[serde(rename = "Multi-quarter")]
    MultiQuarter,
}

impl Timeline {
    pub const ALL: [Timeline; 5] = [
        Timeline::Q1,
        Timeline::Q2,
        Timeline::Q3,
        Timeline::Q4,
        Timeline::MultiQuarter,
    ];

    /// Zero-based month in which the quarter ends, None for multi-quarter
    pub fn closing_month(&self) -> Option<usize> {
        match self {
            Self::Q1 => Some(2),
            Self::Q2 => Some(5),
            Self::Q3 => Some(8),
            Self::Q4 => Some(11),
            Self::MultiQuarter => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1 2025",
            Self::Q2 => "Q2 2025",
            Self::Q3 => "Q3 2025",
            Self::Q4 => "Q4 2025",
            Self::MultiQuarter => "Multi-quarter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.starts_with("multi") {
            return Some(Self::MultiQuarter);
        }
        match s.split_whitespace().next() {
            Some("q1") => Some(Self::Q1),
            Some("q2") => Some(Self::Q2),
            Some("q3") => Some(Self::Q3),
            Some("q4") => Some(Self::Q4),
            _ => None,
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Project priority, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        write!(f, "{}", label)
    }
}

/// A user-defined implementation project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationProject {
    #[serde(default)]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub project_type: String,
    pub timeline: Timeline,
    pub budget: Money,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub success_criteria: String,
    pub created_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpa_package: Option<String>,
}

impl ImplementationProject {
    /// Create a project dated today
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        timeline: Timeline,
        budget: Money,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            category: String::new(),
            project_type: String::new(),
            timeline,
            budget,
            priority: Priority::default(),
            success_criteria: String::new(),
            created_date: Local::now().date_naive(),
            rpa_package: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Required fields: name, description and a positive budget
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(ProjectValidationError::MissingField("description"));
        }
        if !self.budget.is_positive() {
            return Err(ProjectValidationError::NonPositiveBudget);
        }
        if !self.budget.is_within_limit() {
            return Err(ProjectValidationError::BudgetTooLarge);
        }
        Ok(())
    }

    /// Apply a partial update; the ID and creation date never change
    pub fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(project_type) = &patch.project_type {
            self.project_type = project_type.clone();
        }
        if let Some(timeline) = patch.timeline {
            self.timeline = timeline;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(criteria) = &patch.success_criteria {
            self.success_criteria = criteria.clone();
        }
        if let Some(rpa) = &patch.rpa_package {
            self.rpa_package = if rpa.trim().is_empty() {
                None
            } else {
                Some(rpa.clone())
            };
        }
    }
}

impl fmt::Display for ImplementationProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.timeline, self.budget)
    }
}

/// Partial update for a project; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub budget: Option<Money>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub success_criteria: Option<String>,
    /// An empty string unlinks the package
    #[serde(default)]
    pub rpa_package: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Sort orders offered for the project list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSort {
    /// Largest budget first
    Budget,
    /// Most urgent first
    Priority,
    /// Earliest quarter first, multi-quarter last
    Timeline,
}

impl ProjectSort {
    pub fn compare(&self, a: &ImplementationProject, b: &ImplementationProject) -> Ordering {
        match self {
            Self::Budget => b.budget.cmp(&a.budget),
            Self::Priority => b.priority.cmp(&a.priority),
            Self::Timeline => a.timeline.cmp(&b.timeline),
        }
        .then_with(|| a.name.cmp(&b.name))
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Some(Self::Budget),
            "priority" => Some(Self::Priority),
            "timeline" => Some(Self::Timeline),
            _ => None,
        }
    }
}

/// Validation errors for projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    MissingField(&'static str),
    NonPositiveBudget,
    BudgetTooLarge,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Project {} is required", field),
            Self::NonPositiveBudget => write!(f, "Project budget must be greater than zero"),
            Self::BudgetTooLarge => write!(f, "Project budget is above {}", MAX_AMOUNT),
        }
    }
}

impl std::error::Error for ProjectValidationError {}
