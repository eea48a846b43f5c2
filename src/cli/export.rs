//! Export CLI command

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_line_items_csv, export_session_json, export_session_yaml, ExportFormat};
use crate::storage::Storage;

use super::parse_department;

/// Handle the export command
///
/// With no output path the export is written to stdout.
pub fn handle_export_command(
    storage: &Storage,
    session: &str,
    format: &str,
    output: Option<PathBuf>,
    department: Option<String>,
) -> BudgetResult<()> {
    let format = ExportFormat::parse(format).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Unknown export format '{}': use json, yaml or csv",
            format
        ))
    })?;
    let department = department.as_deref().map(parse_department).transpose()?;

    let catalog = storage.load_catalog()?;
    let state = storage.sessions.load(session)?;

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Json => export_session_json(&catalog, session, &state, &mut writer, true)?,
        ExportFormat::Yaml => export_session_yaml(&catalog, session, &state, &mut writer)?,
        ExportFormat::Csv => export_line_items_csv(&catalog, &state, department, &mut writer)?,
    }
    if format == ExportFormat::Json {
        writeln!(writer)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        info!(session, format = %format, path = %path.display(), "session exported");
        eprintln!("Exported '{}' to {}", session, path.display());
    }
    Ok(())
}
