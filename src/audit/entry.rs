//! Audit log entries
//!
//! An entry names what changed (entity type and ID), in which session, and
//! carries the JSON view of the entity before and after the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A department budget was submitted
    Submit,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Submit => write!(f, "SUBMIT"),
        }
    }
}

/// What an entry is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Session,
    ServiceSelection,
    CustomService,
    SupportPackage,
    Project,
    Terms,
    Workflow,
    Catalog,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Session => write!(f, "Session"),
            EntityType::ServiceSelection => write!(f, "ServiceSelection"),
            EntityType::CustomService => write!(f, "CustomService"),
            EntityType::SupportPackage => write!(f, "SupportPackage"),
            EntityType::Project => write!(f, "Project"),
            EntityType::Terms => write!(f, "Terms"),
            EntityType::Workflow => write!(f, "Workflow"),
            EntityType::Catalog => write!(f, "Catalog"),
        }
    }
}

/// One recorded change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    /// Session the operation was applied to; empty for catalog edits
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session: String,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity (e.g. `IT/microsoft_365_e3`)
    pub entity_id: String,

    /// Command or edit description, e.g. `select Microsoft 365 E3 x170`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Changed fields, see `summarize_changes`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn blank(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            session: String::new(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entity came into existence; only `after` is set
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Entity went away; only `before` is set
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Any operation with both views recorded
    pub fn change(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: serde_json::Value,
        after: serde_json::Value,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: Some(before),
            after: Some(after),
            diff_summary,
            ..Self::blank(operation, entity_type, entity_id.into())
        }
    }

    /// Attach the session name
    pub fn in_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    /// One line per entry, plus a `Changes:` line when fields differ
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if !self.session.is_empty() {
            output.push_str(&format!(" @{}", self.session));
        }

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Submit.to_string(), "SUBMIT");
    }

    #[test]
    fn test_entity_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityType::ServiceSelection).unwrap(),
            "\"service_selection\""
        );
        assert_eq!(EntityType::SupportPackage.to_string(), "SupportPackage");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"name": "Portal", "budget": 3000000});
        let entry = AuditEntry::create(
            EntityType::Project,
            "Procurement/0",
            Some("Portal".to_string()),
            &data,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Project);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.session.is_empty());
    }

    #[test]
    fn test_change_entry() {
        let entry = AuditEntry::change(
            Operation::Update,
            EntityType::SupportPackage,
            "IT",
            None,
            json!({"supportPackage": "Bronze"}),
            json!({"supportPackage": "Gold"}),
            Some("supportPackage: \"Bronze\" -> \"Gold\"".to_string()),
        )
        .in_session("apc-2025");

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.session, "apc-2025");
        assert_eq!(entry.before, Some(json!({"supportPackage": "Bronze"})));
        assert!(entry.format_human_readable().contains("Changes: supportPackage"));
    }

    #[test]
    fn test_delete_entry() {
        let data = json!({"name": "Audit"});
        let entry = AuditEntry::delete(EntityType::CustomService, "Legal/0", None, &data);

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_serialization_skips_empty_session() {
        let entry = AuditEntry::create(EntityType::Catalog, "IT/e_sign", None, &json!({}));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("session"));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.entity_type, EntityType::Catalog);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::change(
            Operation::Submit,
            EntityType::Workflow,
            "HR",
            Some("submit budget".to_string()),
            json!({}),
            json!({}),
            None,
        )
        .in_session("hr-plan");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("SUBMIT"));
        assert!(formatted.contains("Workflow"));
        assert!(formatted.contains("@hr-plan"));
        assert!(formatted.contains("submit budget"));
    }
}
