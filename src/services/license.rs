//! License delta resolution
//!
//! Prices a request against an existing contract: only licenses added above
//! the committed count are billed, reductions are free, and setup is never
//! charged again. Requests below the contractual floor are rejected or
//! clamped depending on the configured policy.

use tracing::{debug, warn};

use crate::config::settings::LicenseReductionPolicy;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{LicenseRecord, Money, ServiceDefinition};

/// Cost of a selection once quantity and contract are taken into account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCost {
    /// Quantity that was asked for
    pub requested: u32,
    /// Quantity recorded on the selection (differs when clamped)
    pub effective: u32,
    /// Signed difference to the committed count; zero for net-new services
    pub delta: i64,
    /// Annual cost including setup
    pub annual_cost: Money,
    /// Setup portion of `annual_cost`
    pub setup_cost: Money,
}

impl ResolvedCost {
    pub fn was_clamped(&self) -> bool {
        self.requested != self.effective
    }
}

/// Resolves selection costs for catalog services
pub struct LicenseResolver {
    policy: LicenseReductionPolicy,
}

impl LicenseResolver {
    pub fn new(policy: LicenseReductionPolicy) -> Self {
        Self { policy }
    }

    /// Price a request for a service, using the contract when there is one
    pub fn resolve(
        &self,
        service: &ServiceDefinition,
        record: Option<&LicenseRecord>,
        requested: u32,
        is_new_implementation: bool,
    ) -> BudgetResult<ResolvedCost> {
        match record {
            Some(record) => self.resolve_delta(service, record, requested),
            None => Ok(net_new_cost(service, requested, is_new_implementation)),
        }
    }

    /// Price a request against an existing contract
    pub fn resolve_delta(
        &self,
        service: &ServiceDefinition,
        record: &LicenseRecord,
        requested: u32,
    ) -> BudgetResult<ResolvedCost> {
        let floor = record.floor();
        let effective = if record.allows(requested) {
            requested
        } else {
            match self.policy {
                LicenseReductionPolicy::Reject => {
                    warn!(
                        service = %service.name,
                        requested,
                        floor,
                        "license request below contract floor"
                    );
                    return Err(BudgetError::ContractConstraint {
                        service: service.name.clone(),
                        requested,
                        floor,
                    });
                }
                LicenseReductionPolicy::Clamp => {
                    warn!(
                        service = %service.name,
                        requested,
                        floor,
                        "clamping license request to contract floor"
                    );
                    floor
                }
            }
        };

        let delta = record.delta(effective);
        let annual_cost = if delta > 0 {
            service.pricing.unit_price.times(delta).times(12)
        } else {
            Money::zero()
        };

        debug!(service = %service.name, effective, delta, %annual_cost, "resolved license delta");

        Ok(ResolvedCost {
            requested,
            effective,
            delta,
            annual_cost,
            setup_cost: Money::zero(),
        })
    }
}

/// Cost of a service with no existing contract
///
/// Twelve months at the unit price, plus setup once for a new
/// implementation. Nothing requested means nothing billed.
pub fn net_new_cost(
    service: &ServiceDefinition,
    quantity: u32,
    is_new_implementation: bool,
) -> ResolvedCost {
    let recurring = service.pricing.annual_cost(quantity);
    let setup_cost = if is_new_implementation && quantity > 0 {
        service.setup_cost
    } else {
        Money::zero()
    };

    ResolvedCost {
        requested: quantity,
        effective: quantity,
        delta: 0,
        annual_cost: recurring + setup_cost,
        setup_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricingUnit, ServiceKey};
    use chrono::NaiveDate;

    fn m365() -> ServiceDefinition {
        ServiceDefinition::new(
            "Microsoft 365 E3",
            PricingUnit::PerUser,
            Money::from_units(82),
            Money::from_units(5000),
            "",
        )
    }

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
    fn test_addition_bills_only_delta() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let cost = resolver.resolve_delta(&m365(), &record(150, 50, false), 170).unwrap();
        assert_eq!(cost.delta, 20);
        assert_eq!(cost.annual_cost, Money::from_units(19_680));
        assert_eq!(cost.setup_cost, Money::zero());
    }

    #[test]
    fn test_addition_of_fifty() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let cost = resolver.resolve_delta(&m365(), &record(150, 50, false), 200).unwrap();
        assert_eq!(cost.annual_cost, Money::from_units(82 * 12 * 50));
        assert_eq!(cost.setup_cost, Money::zero());
    }

    #[test]
    fn test_reduction_on_fixed_contract_rejected() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let err = resolver
            .resolve_delta(&m365(), &record(150, 50, false), 100)
            .unwrap_err();
        assert!(matches!(
            err,
            BudgetError::ContractConstraint { requested: 100, floor: 150, .. }
        ));
    }

    #[test]
    fn test_reduction_on_fixed_contract_clamped() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Clamp);
        let cost = resolver.resolve_delta(&m365(), &record(150, 50, false), 100).unwrap();
        assert!(cost.was_clamped());
        assert_eq!(cost.effective, 150);
        assert!(cost.effective >= 50);
        assert_eq!(cost.annual_cost, Money::zero());
    }

    #[test]
    fn test_reducible_contract_reduction_is_free() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let cost = resolver.resolve_delta(&m365(), &record(25, 10, true), 12).unwrap();
        assert_eq!(cost.delta, -13);
        assert_eq!(cost.annual_cost, Money::zero());
    }

    #[test]
    fn test_reducible_contract_keeps_minimum_floor() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        assert!(resolver.resolve_delta(&m365(), &record(25, 10, true), 5).is_err());
    }

    #[test]
    fn test_no_change_costs_nothing() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let cost = resolver.resolve_delta(&m365(), &record(150, 50, false), 150).unwrap();
        assert_eq!(cost.delta, 0);
        assert_eq!(cost.annual_cost, Money::zero());
    }

    #[test]
    fn test_net_new_with_setup() {
        let cost = net_new_cost(&m365(), 10, true);
        assert_eq!(cost.annual_cost, Money::from_units(82 * 12 * 10 + 5000));
        assert_eq!(cost.setup_cost, Money::from_units(5000));

        let cost = net_new_cost(&m365(), 10, false);
        assert_eq!(cost.annual_cost, Money::from_units(82 * 12 * 10));
    }

    #[test]
    fn test_net_new_zero_quantity_is_free() {
        let cost = net_new_cost(&m365(), 0, true);
        assert_eq!(cost.annual_cost, Money::zero());
        assert_eq!(cost.setup_cost, Money::zero());
    }

    #[test]
    fn test_resolve_ignores_new_flag_for_contracts() {
        let resolver = LicenseResolver::new(LicenseReductionPolicy::Reject);
        let cost = resolver
            .resolve(&m365(), Some(&record(150, 50, false)), 160, true)
            .unwrap();
        assert_eq!(cost.setup_cost, Money::zero());
        assert_eq!(cost.annual_cost, Money::from_units(82 * 12 * 10));
    }
}
