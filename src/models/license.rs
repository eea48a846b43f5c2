//! License inventory records
//!
//! Existing IT contracts: how many licenses are committed today, the
//! contractual minimum, and whether the count may be reduced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::ServiceKey;

/// Committed license count for one legacy service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub service_key: ServiceKey,
    pub current_count: u32,
    pub contract_end_date: NaiveDate,
    pub min_commitment: u32,
    pub can_reduce: bool,
}

impl LicenseRecord {
    pub fn new(
        service_key: ServiceKey,
        current_count: u32,
        contract_end_date: NaiveDate,
        min_commitment: u32,
        can_reduce: bool,
    ) -> Self {
        Self {
            service_key,
            current_count,
            contract_end_date,
            min_commitment,
            can_reduce,
        }
    }

    /// Lowest count a request may ask for
    ///
    /// Non-reducible contracts cannot go below the current count. Reducible
    /// contracts may go down to the declared minimum commitment, never below.
    pub fn floor(&self) -> u32 {
        if self.can_reduce {
            self.min_commitment
        } else {
            self.current_count.max(self.min_commitment)
        }
    }

    /// Signed difference between a request and the committed count
    pub fn delta(&self, requested: u32) -> i64 {
        i64::from(requested) - i64::from(self.current_count)
    }

    /// Whether a requested count respects the contract
    pub fn allows(&self, requested: u32) -> bool {
        requested >= self.floor()
    }

    pub fn validate(&self) -> Result<(), LicenseValidationError> {
        if self.min_commitment > self.current_count {
            return Err(LicenseValidationError::CommitmentAboveCurrent {
                current: self.current_count,
                minimum: self.min_commitment,
            });
        }
        Ok(())
    }
}

impl fmt::Display for LicenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} licenses (min {}, {}), ends {}",
            self.service_key,
            self.current_count,
            self.min_commitment,
            if self.can_reduce { "reducible" } else { "fixed" },
            self.contract_end_date
        )
    }
}

/// Validation errors for license records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseValidationError {
    CommitmentAboveCurrent { current: u32, minimum: u32 },
}

impl fmt::Display for LicenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommitmentAboveCurrent { current, minimum } => write!(
                f,
                "minimum commitment {} exceeds current count {}",
                minimum, current
            ),
        }
    }
}

impl std::error::Error for LicenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(current: u32, min: u32, can_reduce: bool) -> LicenseRecord {
        LicenseRecord::new(
            ServiceKey::from_name("Microsoft 365 E3"),
            current,
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            min,
            can_reduce,
        )
    }

    #[test]
    fn test_floor_fixed_contract() {
        let r = record(150, 50, false);
        assert_eq!(r.floor(), 150);
        assert!(!r.allows(100));
        assert!(r.allows(150));
        assert!(r.allows(200));
    }

    #[test]
    fn test_floor_reducible_contract_keeps_minimum() {
        let r = record(25, 10, true);
        assert_eq!(r.floor(), 10);
        assert!(r.allows(10));
        assert!(!r.allows(0));
    }

    #[test]
    fn test_delta() {
        let r = record(150, 50, false);
        assert_eq!(r.delta(170), 20);
        assert_eq!(r.delta(100), -50);
        assert_eq!(r.delta(150), 0);
    }

    #[test]
    fn test_validate() {
        assert!(record(150, 50, false).validate().is_ok());
        assert!(record(10, 50, true).validate().is_err());
    }
}
