//! Audit log CLI command

use crate::error::BudgetResult;
use crate::storage::Storage;

/// Print recent audit entries, optionally for one session
pub fn handle_audit_command(
    storage: &Storage,
    count: usize,
    session: Option<String>,
    verbose: bool,
) -> BudgetResult<()> {
    let audit = storage.audit();
    if !audit.exists() {
        println!("Audit log is empty.");
        return Ok(());
    }

    let entries = match &session {
        Some(name) => {
            let entries = audit.read_session(name)?;
            let skip = entries.len().saturating_sub(count);
            entries.into_iter().skip(skip).collect()
        }
        None => audit.read_recent(count)?,
    };

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
        if verbose {
            if let Some(before) = &entry.before {
                println!("  Before: {}", before);
            }
            if let Some(after) = &entry.after {
                println!("  After:  {}", after);
            }
        }
    }
    Ok(())
}
