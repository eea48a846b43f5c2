//! Stable IDs for list entries
//!
//! Projects and custom services are addressed by list index in the wizard,
//! but carry a UUID so audit entries and exports can refer to them after
//! the list is reordered.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entry_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        /// Prefix and the first eight hex digits
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                write!(f, "{}{}", $prefix, &hex[..8])
            }
        }
    };
}

entry_id!(ProjectId, "prj-");
entry_id!(CustomServiceId, "cus-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ProjectId::new(), ProjectId::new());
        assert!(!CustomServiceId::new().uuid().is_nil());
    }

    #[test]
    fn test_short_display() {
        let shown = ProjectId::new().to_string();
        assert!(shown.starts_with("prj-"));
        assert_eq!(shown.len(), 12);
    }

    #[test]
    fn test_serialized_as_plain_uuid() {
        let id = CustomServiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.uuid()));
        assert_eq!(serde_json::from_str::<CustomServiceId>(&json).unwrap(), id);
    }
}
