//! Budget snapshot and submission records
//!
//! A snapshot is always derived from selections and the catalog; it is
//! stored only as part of a submission, as a record of what was submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::department::Department;
use super::money::Money;

/// Budget totals above which high-value terms must be accepted
pub const HIGH_VALUE_THRESHOLD: Money = Money::from_units(100_000);

/// Fiscal year every reference ID and projection is stamped with
pub const FISCAL_YEAR: i32 = 2025;

/// Computed totals for one department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub operational_total: Money,
    pub support_total: Money,
    pub project_total: Money,
    pub grand_total: Money,
}

impl BudgetSnapshot {
    pub fn new(operational_total: Money, support_total: Money, project_total: Money) -> Self {
        Self {
            operational_total,
            support_total,
            project_total,
            grand_total: operational_total + support_total + project_total,
        }
    }

    /// Strictly above the threshold; exactly 100,000 is not high value
    pub fn is_high_value(&self) -> bool {
        self.grand_total > HIGH_VALUE_THRESHOLD
    }

    pub fn is_empty(&self) -> bool {
        self.grand_total.is_zero()
    }
}

impl std::ops::Add for BudgetSnapshot {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.operational_total + other.operational_total,
            self.support_total + other.support_total,
            self.project_total + other.project_total,
        )
    }
}

impl std::iter::Sum for BudgetSnapshot {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(BudgetSnapshot::default(), |acc, s| acc + s)
    }
}

impl fmt::Display for BudgetSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operational {} + support {} + projects {} = {}",
            self.operational_total, self.support_total, self.project_total, self.grand_total
        )
    }
}

/// A submitted department budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub reference_id: String,
    pub company: String,
    pub department: Department,
    pub contact_person: String,
    pub grand_total: Money,
    pub submitted_at: DateTime<Utc>,
    pub snapshot: BudgetSnapshot,
}

impl Submission {
    /// Reference ID in the form `{company}-{DEP}-2025-{yyyymmddHHMMSS}`
    pub fn reference_id(company: &str, department: Department, at: DateTime<Utc>) -> String {
        let company = if company.trim().is_empty() {
            "ALK"
        } else {
            company.trim()
        };
        format!(
            "{}-{}-{}-{}",
            company,
            department.code(),
            FISCAL_YEAR,
            at.format("%Y%m%d%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_totals() {
        let s = BudgetSnapshot::new(
            Money::from_units(19_680),
            Money::from_units(195_975),
            Money::from_units(50_000),
        );
        assert_eq!(s.grand_total, Money::from_units(265_655));
        assert!(s.is_high_value());
    }

    #[test]
    fn test_high_value_is_strict() {
        let exact = BudgetSnapshot::new(Money::from_units(100_000), Money::zero(), Money::zero());
        assert!(!exact.is_high_value());

        let above = BudgetSnapshot::new(Money::from_units(100_001), Money::zero(), Money::zero());
        assert!(above.is_high_value());
    }

    #[test]
    fn test_snapshot_sum() {
        let a = BudgetSnapshot::new(Money::from_units(1), Money::from_units(2), Money::from_units(3));
        let b = BudgetSnapshot::new(Money::from_units(10), Money::zero(), Money::zero());
        let total: BudgetSnapshot = vec![a, b].into_iter().sum();
        assert_eq!(total.operational_total, Money::from_units(11));
        assert_eq!(total.grand_total, Money::from_units(16));
    }

    #[test]
    fn test_reference_id() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 9, 5, 7).unwrap();
        assert_eq!(
            Submission::reference_id("APC", Department::FacilitySafety, at),
            "APC-FAC-2025-20250304090507"
        );
        assert_eq!(
            Submission::reference_id("", Department::It, at),
            "ALK-IT-2025-20250304090507"
        );
    }
}
