//! YAML Export functionality
//!
//! Same document as the JSON export, for reading and hand review.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::SessionExport;
use crate::models::Catalog;
use crate::session::SessionState;

/// Export a session to YAML format
pub fn export_session_yaml<W: Write>(
    catalog: &Catalog,
    name: &str,
    state: &SessionState,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = SessionExport::new(catalog, name, state)?;

    let header = [
        "# Budget Wizard Session Export".to_string(),
        format!("# Session: {}", export.session_name),
        format!("# Generated: {}", export.exported_at),
        format!("# App Version: {}", export.app_version),
        "#".to_string(),
        "# Amounts are in minor units (hundredths).".to_string(),
    ];
    for line in &header {
        writeln!(writer, "{}", line).map_err(|e| BudgetError::Export(e.to_string()))?;
    }
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

/// Read a YAML export back and check it against the catalog
pub fn import_session_yaml(catalog: &Catalog, yaml_str: &str) -> BudgetResult<SessionExport> {
    let export: SessionExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BudgetError::Export(e.to_string()))?;

    export.validate(catalog).map_err(BudgetError::Export)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, SupportExtras};
    use crate::storage::init::default_catalog;

    #[test]
    fn test_yaml_export() {
        let catalog = default_catalog();
        let mut state = SessionState::new(&catalog);
        state
            .support_extras
            .insert(Department::Legal, SupportExtras::new(2, 1, 0));

        let mut output = Vec::new();
        export_session_yaml(&catalog, "legal", &state, &mut output).unwrap();

        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# Budget Wizard Session Export"));
        assert!(yaml.contains("# Session: legal"));
        assert!(yaml.contains("schema_version:"));

        let imported = import_session_yaml(&catalog, &yaml).unwrap();
        assert_eq!(imported.session, state);
    }
}
