//! Terms acceptance tracking
//!
//! Four independent kinds of acceptance slot: system-wide, one per
//! department, high-value and budget submission. Each slot moves
//! `NotPresented -> Presented -> Accepted`, or `Presented -> Declined`
//! and back to `Presented`. Accepted is terminal except for a newer
//! terms version replacing the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::department::Department;

/// Identifies one acceptance tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TermsSlot {
    SystemWide,
    Department(Department),
    HighValue,
    BudgetSubmission,
}

impl TermsSlot {
    /// Stable string form used as a map key in persisted documents
    pub fn key(&self) -> String {
        match self {
            Self::SystemWide => "system_wide".to_string(),
            Self::Department(d) => format!("department:{}", d.key()),
            Self::HighValue => "high_value".to_string(),
            Self::BudgetSubmission => "budget_submission".to_string(),
        }
    }

    /// Parse the key form, also accepting a few loose spellings
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(dept) = s
            .strip_prefix("department:")
            .or_else(|| s.strip_prefix("department/"))
        {
            return Department::parse(dept).map(Self::Department);
        }
        match s.to_lowercase().replace('-', "_").as_str() {
            "system_wide" | "system" => Some(Self::SystemWide),
            "high_value" => Some(Self::HighValue),
            "budget_submission" | "submission" => Some(Self::BudgetSubmission),
            _ => None,
        }
    }

    pub fn department(&self) -> Option<Department> {
        match self {
            Self::Department(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for TermsSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemWide => write!(f, "system-wide terms"),
            Self::Department(d) => write!(f, "department terms ({})", d),
            Self::HighValue => write!(f, "high-value terms"),
            Self::BudgetSubmission => write!(f, "budget submission terms"),
        }
    }
}

impl From<TermsSlot> for String {
    fn from(slot: TermsSlot) -> Self {
        slot.key()
    }
}

impl TryFrom<String> for TermsSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown terms slot '{}'", value))
    }
}

/// Where a slot is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsStatus {
    #[default]
    NotPresented,
    Presented,
    Accepted,
    Declined,
}

impl fmt::Display for TermsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotPresented => "not presented",
            Self::Presented => "presented",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        };
        write!(f, "{}", label)
    }
}

/// Acceptance record for one slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TermsAcceptanceRecord {
    pub status: TermsStatus,
    pub accepted: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: u32,
    /// Who or what recorded the acceptance ("cli", "wizard", ...)
    #[serde(default)]
    pub origin_marker: String,
}

/// Outcome of an accept call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Newly accepted, or accepted again under a newer version
    Recorded,
    /// Already accepted for this version; nothing changed
    Unchanged,
}

/// Errors raised by terms transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermsTransitionError {
    /// Accepting an older version than the one on record
    StaleVersion { recorded: u32, offered: u32 },
    /// Accepted slots cannot be declined
    AlreadyAccepted,
    /// Only a slot currently shown to the user can be accepted
    NotPresented { status: TermsStatus },
}

impl fmt::Display for TermsTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleVersion { recorded, offered } => write!(
                f,
                "terms version {} is older than accepted version {}",
                offered, recorded
            ),
            Self::AlreadyAccepted => write!(f, "accepted terms cannot be declined"),
            Self::NotPresented { status } => write!(
                f,
                "terms must be presented before they can be accepted (currently {})",
                status
            ),
        }
    }
}

impl std::error::Error for TermsTransitionError {}

/// All acceptance records of a session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermsLedger {
    records: BTreeMap<TermsSlot, TermsAcceptanceRecord>,
}

impl TermsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, slot: &TermsSlot) -> Option<&TermsAcceptanceRecord> {
        self.records.get(slot)
    }

    pub fn status(&self, slot: &TermsSlot) -> TermsStatus {
        self.records
            .get(slot)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    pub fn is_accepted(&self, slot: &TermsSlot) -> bool {
        self.status(slot) == TermsStatus::Accepted
    }

    /// Show a slot to the user. Accepted slots stay accepted.
    ///
    /// Returns true when the status actually changed.
    pub fn present(&mut self, slot: TermsSlot) -> bool {
        let record = self.records.entry(slot).or_default();
        match record.status {
            TermsStatus::NotPresented | TermsStatus::Declined => {
                record.status = TermsStatus::Presented;
                true
            }
            TermsStatus::Presented | TermsStatus::Accepted => false,
        }
    }

    /// Accept a slot at a terms version
    ///
    /// The slot must be Presented, or already Accepted when a newer version
    /// is being acknowledged. Declined slots have to be presented again.
    pub fn accept(
        &mut self,
        slot: TermsSlot,
        version: u32,
        origin: &str,
        at: DateTime<Utc>,
    ) -> Result<AcceptOutcome, TermsTransitionError> {
        let status = self.status(&slot);
        if matches!(status, TermsStatus::NotPresented | TermsStatus::Declined) {
            return Err(TermsTransitionError::NotPresented { status });
        }

        let record = self.records.entry(slot).or_default();
        match record.status {
            TermsStatus::Accepted if version == record.version => {
                return Ok(AcceptOutcome::Unchanged);
            }
            TermsStatus::Accepted if version < record.version => {
                return Err(TermsTransitionError::StaleVersion {
                    recorded: record.version,
                    offered: version,
                });
            }
            _ => {}
        }

        *record = TermsAcceptanceRecord {
            status: TermsStatus::Accepted,
            accepted: true,
            timestamp: Some(at),
            version,
            origin_marker: origin.to_string(),
        };
        Ok(AcceptOutcome::Recorded)
    }

    /// Decline a slot; other slots are untouched
    pub fn decline(&mut self, slot: TermsSlot) -> Result<(), TermsTransitionError> {
        let record = self.records.entry(slot).or_default();
        if record.status == TermsStatus::Accepted {
            return Err(TermsTransitionError::AlreadyAccepted);
        }
        record.status = TermsStatus::Declined;
        record.accepted = false;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TermsSlot, &TermsAcceptanceRecord)> {
        self.records.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn presented(slots: &[TermsSlot]) -> TermsLedger {
        let mut ledger = TermsLedger::new();
        for slot in slots {
            ledger.present(*slot);
        }
        ledger
    }

    #[test]
    fn test_slot_key_round_trip() {
        for slot in [
            TermsSlot::SystemWide,
            TermsSlot::Department(Department::FacilitySafety),
            TermsSlot::HighValue,
            TermsSlot::BudgetSubmission,
        ] {
            assert_eq!(TermsSlot::parse(&slot.key()), Some(slot));
        }
        assert_eq!(TermsSlot::parse("submission"), Some(TermsSlot::BudgetSubmission));
        assert_eq!(TermsSlot::parse("department:Marketing"), None);
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(
            TermsSlot::Department(Department::Legal).to_string(),
            "department terms (Legal)"
        );
        assert_eq!(TermsSlot::HighValue.to_string(), "high-value terms");
    }

    #[test]
    fn test_ledger_serializes_as_string_keyed_map() {
        let mut ledger = TermsLedger::new();
        ledger.present(TermsSlot::Department(Department::It));
        let value = serde_json::to_value(&ledger).unwrap();
        assert_eq!(value["department:IT"]["status"], "presented");

        let back: TermsLedger = serde_json::from_value(value).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn test_present_then_accept() {
        let mut ledger = TermsLedger::new();
        assert_eq!(ledger.status(&TermsSlot::SystemWide), TermsStatus::NotPresented);
        assert!(ledger.present(TermsSlot::SystemWide));
        assert!(!ledger.present(TermsSlot::SystemWide));

        let outcome = ledger.accept(TermsSlot::SystemWide, 1, "test", now()).unwrap();
        assert_eq!(outcome, AcceptOutcome::Recorded);
        assert!(ledger.is_accepted(&TermsSlot::SystemWide));

        let record = ledger.record(&TermsSlot::SystemWide).unwrap();
        assert!(record.accepted);
        assert_eq!(record.version, 1);
        assert_eq!(record.origin_marker, "test");
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_accept_is_idempotent_for_same_version() {
        let mut ledger = presented(&[TermsSlot::HighValue]);
        ledger.accept(TermsSlot::HighValue, 2, "a", now()).unwrap();
        let first = ledger.record(&TermsSlot::HighValue).cloned();

        let outcome = ledger.accept(TermsSlot::HighValue, 2, "b", now()).unwrap();
        assert_eq!(outcome, AcceptOutcome::Unchanged);
        assert_eq!(ledger.record(&TermsSlot::HighValue).cloned(), first);
    }

    #[test]
    fn test_newer_version_overwrites_older_rejected() {
        let mut ledger = presented(&[TermsSlot::SystemWide]);
        ledger.accept(TermsSlot::SystemWide, 2, "a", now()).unwrap();
        ledger.accept(TermsSlot::SystemWide, 3, "b", now()).unwrap();
        assert_eq!(ledger.record(&TermsSlot::SystemWide).unwrap().version, 3);

        let err = ledger.accept(TermsSlot::SystemWide, 1, "c", now()).unwrap_err();
        assert_eq!(err, TermsTransitionError::StaleVersion { recorded: 3, offered: 1 });
    }

    #[test]
    fn test_decline_is_re_presentable_and_isolated() {
        let mut ledger = presented(&[
            TermsSlot::SystemWide,
            TermsSlot::Department(Department::Hr),
        ]);
        ledger.accept(TermsSlot::SystemWide, 1, "a", now()).unwrap();
        ledger.decline(TermsSlot::Department(Department::Hr)).unwrap();

        assert_eq!(
            ledger.status(&TermsSlot::Department(Department::Hr)),
            TermsStatus::Declined
        );
        assert!(ledger.is_accepted(&TermsSlot::SystemWide));

        assert!(ledger.present(TermsSlot::Department(Department::Hr)));
        assert_eq!(
            ledger.status(&TermsSlot::Department(Department::Hr)),
            TermsStatus::Presented
        );
    }

    #[test]
    fn test_cannot_decline_accepted() {
        let mut ledger = presented(&[TermsSlot::BudgetSubmission]);
        ledger.accept(TermsSlot::BudgetSubmission, 1, "a", now()).unwrap();
        assert_eq!(
            ledger.decline(TermsSlot::BudgetSubmission),
            Err(TermsTransitionError::AlreadyAccepted)
        );
    }

    #[test]
    fn test_accept_without_presenting_rejected() {
        let mut ledger = TermsLedger::new();
        assert_eq!(
            ledger.accept(TermsSlot::HighValue, 1, "a", now()),
            Err(TermsTransitionError::NotPresented {
                status: TermsStatus::NotPresented
            })
        );
        assert!(ledger.record(&TermsSlot::HighValue).is_none());
    }

    #[test]
    fn test_declined_must_be_presented_again() {
        let mut ledger = presented(&[TermsSlot::SystemWide]);
        ledger.decline(TermsSlot::SystemWide).unwrap();

        assert_eq!(
            ledger.accept(TermsSlot::SystemWide, 1, "a", now()),
            Err(TermsTransitionError::NotPresented {
                status: TermsStatus::Declined
            })
        );
        assert_eq!(ledger.status(&TermsSlot::SystemWide), TermsStatus::Declined);

        ledger.present(TermsSlot::SystemWide);
        assert_eq!(
            ledger.accept(TermsSlot::SystemWide, 1, "a", now()),
            Ok(AcceptOutcome::Recorded)
        );
    }
}
