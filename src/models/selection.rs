//! Selection state models
//!
//! What a user picked for a department: catalog services, free-form custom
//! services, and paid extras on top of a support package.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::ServiceKey;
use super::ids::CustomServiceId;
use super::money::{Money, MAX_AMOUNT};

/// Price of one extra support request beyond the package quota
pub const EXTRA_SUPPORT_REQUEST_PRICE: Money = Money::from_units(1800);

/// Price of one extra training session
pub const EXTRA_TRAINING_SESSION_PRICE: Money = Money::from_units(5399);

/// Price of one extra custom report
pub const EXTRA_REPORT_PRICE: Money = Money::from_units(5399);

/// A user's choice for one catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub service_key: ServiceKey,
    pub selected: bool,
    pub requested_quantity: u32,
    pub is_new_implementation: bool,
    /// Annual cost including any one-off setup; zero when not selected
    pub computed_annual_cost: Money,
    /// Setup portion of `computed_annual_cost`
    #[serde(default)]
    pub setup_cost_applied: Money,
}

impl ServiceSelection {
    /// A selection with cost already resolved
    pub fn selected(
        service_key: ServiceKey,
        requested_quantity: u32,
        is_new_implementation: bool,
        computed_annual_cost: Money,
        setup_cost_applied: Money,
    ) -> Self {
        Self {
            service_key,
            selected: true,
            requested_quantity,
            is_new_implementation,
            computed_annual_cost,
            setup_cost_applied,
        }
    }

    /// A cleared selection: nothing requested, nothing billed
    pub fn deselected(service_key: ServiceKey) -> Self {
        Self {
            service_key,
            selected: false,
            requested_quantity: 0,
            is_new_implementation: false,
            computed_annual_cost: Money::zero(),
            setup_cost_applied: Money::zero(),
        }
    }

    /// Cost this selection contributes to the operational total
    pub fn billable_cost(&self) -> Money {
        if self.selected {
            self.computed_annual_cost
        } else {
            Money::zero()
        }
    }
}

/// A service the user adds outside the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomServiceEntry {
    #[serde(default)]
    pub id: CustomServiceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Yearly amount billed, setup included
    pub annual_cost: Money,
    pub setup_cost: Money,
}

impl CustomServiceEntry {
    /// Build an entry from a recurring yearly amount plus a one-off setup
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        recurring_cost: Money,
        setup_cost: Money,
    ) -> Self {
        Self {
            id: CustomServiceId::new(),
            name: name.into(),
            description: description.into(),
            annual_cost: recurring_cost + setup_cost,
            setup_cost,
        }
    }

    pub fn validate(&self) -> Result<(), SelectionValidationError> {
        if self.name.trim().is_empty() {
            return Err(SelectionValidationError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(SelectionValidationError::MissingField("description"));
        }
        if self.annual_cost.is_negative() || self.setup_cost.is_negative() {
            return Err(SelectionValidationError::NegativeAmount);
        }
        if !self.annual_cost.is_within_limit() {
            return Err(SelectionValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

impl fmt::Display for CustomServiceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.annual_cost)
    }
}

/// Paid additions on top of the selected support package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportExtras {
    #[serde(default)]
    pub extra_support_requests: u32,
    #[serde(default)]
    pub extra_training_sessions: u32,
    #[serde(default)]
    pub extra_reports: u32,
}

impl SupportExtras {
    pub fn new(support_requests: u32, training_sessions: u32, reports: u32) -> Self {
        Self {
            extra_support_requests: support_requests,
            extra_training_sessions: training_sessions,
            extra_reports: reports,
        }
    }

    /// Cost of the extras alone
    pub fn cost(&self) -> Money {
        EXTRA_SUPPORT_REQUEST_PRICE.times(i64::from(self.extra_support_requests))
            + EXTRA_TRAINING_SESSION_PRICE.times(i64::from(self.extra_training_sessions))
            + EXTRA_REPORT_PRICE.times(i64::from(self.extra_reports))
    }

    pub fn is_empty(&self) -> bool {
        self.extra_support_requests == 0
            && self.extra_training_sessions == 0
            && self.extra_reports == 0
    }
}

/// Validation errors for selection inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionValidationError {
    MissingField(&'static str),
    NegativeAmount,
    AmountTooLarge,
}

impl fmt::Display for SelectionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Custom service {} is required", field),
            Self::NegativeAmount => write!(f, "Custom service amounts cannot be negative"),
            Self::AmountTooLarge => write!(f, "Custom service cost is above {}", MAX_AMOUNT),
        }
    }
}

impl std::error::Error for SelectionValidationError {}
