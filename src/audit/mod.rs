//! Audit logging for the budget wizard
//!
//! Records every applied session command and catalog edit with before/after
//! values in an append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: one audit log entry with timestamp, session, operation,
//!   entity information, and optional before/after values.
//! - `AuditLogger`: writes entries to the audit log file as line-delimited
//!   JSON (JSONL) and reads them back.
//! - `field_changes` / `summarize_changes`: the fields that differ between
//!   two JSON views, as typed changes or one summary line.
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_wizard::audit::{AuditEntry, AuditLogger, EntityType, Operation};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let diff = summarize_changes(&before, &after);
//! let entry = AuditEntry::change(
//!     Operation::Update,
//!     EntityType::SupportPackage,
//!     "IT",
//!     Some("select support package Gold".to_string()),
//!     before,
//!     after,
//!     diff,
//! )
//! .in_session("apc-2025");
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{field_changes, summarize_changes, FieldChange};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
