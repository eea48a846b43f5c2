//! JSON Export functionality
//!
//! Exports a session document to JSON with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetSnapshot, Catalog, Department};
use crate::services::BudgetService;
use crate::session::SessionState;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported session with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub session_name: String,

    /// The persisted session document
    pub session: SessionState,

    pub metadata: ExportMetadata,
}

/// Totals at export time, for reference only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub company: String,

    /// Snapshot of every department with input
    pub departments: Vec<(Department, BudgetSnapshot)>,

    pub submission_count: usize,
}

impl SessionExport {
    pub fn new(catalog: &Catalog, name: &str, state: &SessionState) -> BudgetResult<Self> {
        let budget = BudgetService::new(catalog);
        let departments = state
            .active_departments()
            .into_iter()
            .map(|d| budget.snapshot(state, d).map(|s| (d, s)))
            .collect::<BudgetResult<Vec<_>>>()?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            session_name: name.to_string(),
            metadata: ExportMetadata {
                company: state.company_info.company.clone(),
                departments,
                submission_count: state.submissions.len(),
            },
            session: state.clone(),
        })
    }

    /// Validate the export structure against a catalog
    pub fn validate(&self, catalog: &Catalog) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let budget = BudgetService::new(catalog);
        for (department, snapshot) in &self.metadata.departments {
            let recomputed = budget
                .snapshot(&self.session, *department)
                .map_err(|e| e.to_string())?;
            if recomputed != *snapshot {
                return Err(format!(
                    "{} totals do not match the exported session ({} vs {})",
                    department, snapshot.grand_total, recomputed.grand_total
                ));
            }
        }

        Ok(())
    }
}

/// Export a session to JSON
pub fn export_session_json<W: Write>(
    catalog: &Catalog,
    name: &str,
    state: &SessionState,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = SessionExport::new(catalog, name, state)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON export back and check it against the catalog
pub fn import_session_json(catalog: &Catalog, json_str: &str) -> BudgetResult<SessionExport> {
    let export: SessionExport =
        serde_json::from_str(json_str).map_err(|e| BudgetError::Export(e.to_string()))?;

    export.validate(catalog).map_err(BudgetError::Export)?;

    Ok(export)
}
