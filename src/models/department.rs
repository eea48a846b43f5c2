//! Shared service departments
//!
//! The five departments are fixed; they key every per-department map in the
//! catalog and in a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::PricingUnit;

/// One of the fixed shared-service departments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Legal")]
    Legal,
    #[serde(rename = "Procurement")]
    Procurement,
    #[serde(rename = "Facility_Safety")]
    FacilitySafety,
}

impl Department {
    /// All departments in display order
    pub const ALL: [Department; 5] = [
        Department::It,
        Department::Hr,
        Department::Legal,
        Department::Procurement,
        Department::FacilitySafety,
    ];

    /// Catalog key, as stored in persisted documents
    pub fn key(&self) -> &'static str {
        match self {
            Self::It => "IT",
            Self::Hr => "HR",
            Self::Legal => "Legal",
            Self::Procurement => "Procurement",
            Self::FacilitySafety => "Facility_Safety",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::It => "Information Technology",
            Self::Hr => "Human Resources",
            Self::Legal => "Legal Services",
            Self::Procurement => "Procurement & Supply Chain",
            Self::FacilitySafety => "Facilities & Safety",
        }
    }

    /// Short description of what the department offers
    pub fn description(&self) -> &'static str {
        match self {
            Self::It => "Digital transformation, technology infrastructure, enterprise applications, software licensing",
            Self::Hr => "Talent management, employee development, HR operations, organizational effectiveness",
            Self::Legal => "Legal counsel, contract management, compliance, risk management, intellectual property",
            Self::Procurement => "Purchasing, vendor management, contracts, supply chain optimization",
            Self::FacilitySafety => "Facility management, workplace safety, security, environmental compliance",
        }
    }

    /// Three-letter code used in submission reference IDs
    pub fn code(&self) -> String {
        self.key().chars().take(3).collect::<String>().to_uppercase()
    }

    /// Pricing unit applied when an admin adds a service without naming one
    pub fn default_pricing_unit(&self) -> PricingUnit {
        match self {
            Self::It | Self::Hr => PricingUnit::PerUser,
            Self::Legal => PricingUnit::PerContract,
            Self::Procurement => PricingUnit::PerTransaction,
            Self::FacilitySafety => PricingUnit::PerSqMeter,
        }
    }

    /// Whether this department tracks existing license commitments
    pub fn has_license_inventory(&self) -> bool {
        matches!(self, Self::It)
    }

    /// Parse a department from its key, its title, or a loose spelling
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "it" | "informationtechnology" => Some(Self::It),
            "hr" | "humanresources" => Some(Self::Hr),
            "legal" | "legalservices" => Some(Self::Legal),
            "procurement" | "procurementsupplychain" => Some(Self::Procurement),
            "facilitysafety" | "facilitiessafety" | "facility" | "facilities" => {
                Some(Self::FacilitySafety)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Department {
    type Err = crate::error::BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::BudgetError::department_not_found(s))
    }
}
