//! Export module for the budget wizard
//!
//! Session export in several formats:
//! - CSV: budget line items (spreadsheet-compatible)
//! - JSON: the full session document, machine-readable
//! - YAML: the same document for human review

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_line_items_csv, CSV_HEADER};
pub use json::{export_session_json, import_session_json, SessionExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_session_yaml, import_session_yaml};

use std::fmt;

/// Output format of `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
