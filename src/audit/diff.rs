//! Change summaries for audit entries
//!
//! Walks the before and after JSON views of a session slice and lists the
//! leaf fields that differ, addressed by path
//! (`operationalServices.microsoft_365_e3.requested_quantity`).

use std::fmt;

use serde_json::Value;

/// Most changes listed in one summary line
const MAX_LISTED_CHANGES: usize = 8;

/// Longest string value shown before truncation, in characters
const MAX_STRING_CHARS: usize = 50;

/// One changed field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Added { path: String, value: Value },
    Removed { path: String, value: Value },
    Modified { path: String, before: Value, after: Value },
    /// A list changed length; items are not compared one by one
    Resized { path: String, before: usize, after: usize },
}

impl FieldChange {
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. }
            | Self::Removed { path, .. }
            | Self::Modified { path, .. }
            | Self::Resized { path, .. } => path,
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, value } => write!(f, "{}: (added) -> {}", path, short(value)),
            Self::Removed { path, value } => write!(f, "{}: {} -> (removed)", path, short(value)),
            Self::Modified {
                path,
                before,
                after,
            } => write!(f, "{}: {} -> {}", path, short(before), short(after)),
            Self::Resized {
                path,
                before,
                after,
            } => write!(f, "{}: [{} items] -> [{} items]", path, before, after),
        }
    }
}

/// Every leaf difference between two JSON values
pub fn field_changes(before: &Value, after: &Value) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    walk(before, after, String::new(), &mut changes);
    changes
}

/// Changes joined into one line, capped for readability
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let changes = field_changes(before, after);
    if changes.is_empty() {
        return None;
    }

    let listed = changes
        .iter()
        .take(MAX_LISTED_CHANGES)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if changes.len() > MAX_LISTED_CHANGES {
        Some(format!("{} (+{} more)", listed, changes.len() - MAX_LISTED_CHANGES))
    } else {
        Some(listed)
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn walk(before: &Value, after: &Value, path: String, out: &mut Vec<FieldChange>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            for (key, old) in b {
                match a.get(key) {
                    Some(new) => walk(old, new, join(&path, key), out),
                    None => out.push(FieldChange::Removed {
                        path: join(&path, key),
                        value: old.clone(),
                    }),
                }
            }
            for (key, new) in a.iter().filter(|(key, _)| !b.contains_key(*key)) {
                out.push(FieldChange::Added {
                    path: join(&path, key),
                    value: new.clone(),
                });
            }
        }
        (Value::Array(b), Value::Array(a)) if b.len() != a.len() => {
            out.push(FieldChange::Resized {
                path,
                before: b.len(),
                after: a.len(),
            });
        }
        (Value::Array(b), Value::Array(a)) => {
            for (i, (old, new)) in b.iter().zip(a).enumerate() {
                walk(old, new, format!("{}[{}]", path, i), out);
            }
        }
        _ => out.push(FieldChange::Modified {
            path,
            before: before.clone(),
            after: after.clone(),
        }),
    }
}

/// Compact rendering; containers show their size only
fn short(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_package_change() {
        let before = json!({"supportPackage": "Bronze", "department": "IT"});
        let after = json!({"supportPackage": "Gold", "department": "IT"});

        assert_eq!(
            summarize_changes(&before, &after).unwrap(),
            "supportPackage: \"Bronze\" -> \"Gold\""
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"department": "HR", "supportPackage": "Basic"});
        let after = json!({"department": "HR", "supportExtras": {"extra_reports": 1}});

        let summary = summarize_changes(&before, &after).unwrap();
        assert!(summary.contains("supportPackage: \"Basic\" -> (removed)"));
        assert!(summary.contains("supportExtras: (added) -> {1 fields}"));
    }

    #[test]
    fn test_identical_values() {
        let value = json!({"department": "Legal", "implementationProjects": []});
        assert!(field_changes(&value, &value).is_empty());
        assert!(summarize_changes(&value, &value).is_none());
    }

    #[test]
    fn test_nested_quantity_path() {
        let before = json!({"operationalServices": {"microsoft_365_e3": {"requested_quantity": 150}}});
        let after = json!({"operationalServices": {"microsoft_365_e3": {"requested_quantity": 170}}});

        let changes = field_changes(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].path(),
            "operationalServices.microsoft_365_e3.requested_quantity"
        );
        assert_eq!(
            changes[0].to_string(),
            "operationalServices.microsoft_365_e3.requested_quantity: 150 -> 170"
        );
    }

    #[test]
    fn test_list_length_and_items() {
        let removed = field_changes(
            &json!({"customServices": [{"name": "Audit"}]}),
            &json!({"customServices": []}),
        );
        assert_eq!(removed[0].to_string(), "customServices: [1 items] -> [0 items]");

        let edited = field_changes(
            &json!({"projects": [{"budget": 100}, {"budget": 200}]}),
            &json!({"projects": [{"budget": 100}, {"budget": 250}]}),
        );
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].path(), "projects[1].budget");
    }

    #[test]
    fn test_summary_is_capped() {
        let before = json!({"a": 0, "b": 0, "c": 0, "d": 0, "e": 0, "f": 0, "g": 0, "h": 0, "i": 0, "j": 0});
        let after = json!({"a": 1, "b": 1, "c": 1, "d": 1, "e": 1, "f": 1, "g": 1, "h": 1, "i": 1, "j": 1});

        assert!(summarize_changes(&before, &after).unwrap().ends_with("(+2 more)"));
    }

    #[test]
    fn test_long_strings_truncated() {
        let changes = field_changes(&json!({"content": "ع".repeat(100)}), &json!({"content": "short"}));
        assert!(changes[0].to_string().contains("...\""));
    }
}
