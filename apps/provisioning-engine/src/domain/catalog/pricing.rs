//! Tiered cost calculation.
//!
//! Base price covers bandwidth up to the service's base bandwidth; usage
//! above that is billed per Mbps; usage below it is not discounted.

use rust_decimal::Decimal;

use super::service::ServiceDefinition;
use crate::domain::shared::{Bandwidth, DomainError, Money};

/// Pure monthly/setup cost calculator shared by all workflows.
///
/// All arithmetic is fixed-point decimal; results round to 2 decimal places
/// at the final step only, so chained calculations never accumulate rounding
/// error.
pub struct PricingCalculator;

impl PricingCalculator {
    /// Monthly cost of a service at the given bandwidth.
    ///
    /// With no bandwidth, the base monthly price is returned unchanged (no
    /// extrapolation). Bandwidth at or below the base bandwidth bills the
    /// base price as-is: downgrades do not reduce the monthly floor.
    ///
    /// # Errors
    ///
    /// Returns error if the service has no base monthly price.
    pub fn monthly_cost(
        service: &ServiceDefinition,
        bandwidth: Option<Bandwidth>,
    ) -> Result<Money, DomainError> {
        Self::monthly_cost_raw(service, bandwidth).map(|d| Money::new(d).round())
    }

    /// One-off setup fee of a service; absent fees bill as zero.
    #[must_use]
    pub fn setup_fee(service: &ServiceDefinition) -> Money {
        service.setup_fee.unwrap_or(Money::ZERO).round()
    }

    /// Total cost of a new-service order: first month plus setup fee.
    ///
    /// # Errors
    ///
    /// Returns error if the service has no base monthly price.
    pub fn new_service_total(
        service: &ServiceDefinition,
        bandwidth: Option<Bandwidth>,
    ) -> Result<Money, DomainError> {
        let monthly = Self::monthly_cost_raw(service, bandwidth)?;
        let setup = service.setup_fee.map_or(Decimal::ZERO, |fee| fee.amount());
        Ok(Money::new(monthly + setup).round())
    }

    /// Signed monthly-cost delta of a bandwidth modification.
    ///
    /// Negative for decreases that cross the base-bandwidth tier; zero when
    /// both values bill the same.
    ///
    /// # Errors
    ///
    /// Returns error if the service has no base monthly price.
    pub fn modification_delta(
        service: &ServiceDefinition,
        old: Option<Bandwidth>,
        new: Option<Bandwidth>,
    ) -> Result<Money, DomainError> {
        let old_cost = Self::monthly_cost_raw(service, old)?;
        let new_cost = Self::monthly_cost_raw(service, new)?;
        Ok(Money::new(new_cost - old_cost).round())
    }

    // Unrounded monthly cost; callers round once at the final result.
    fn monthly_cost_raw(
        service: &ServiceDefinition,
        bandwidth: Option<Bandwidth>,
    ) -> Result<Decimal, DomainError> {
        let base_price = service
            .base_price_monthly
            .ok_or_else(|| DomainError::InvalidValue {
                field: "base_price_monthly".to_string(),
                message: format!("service {} has no base monthly price", service.id),
            })?
            .amount();

        let Some(bandwidth) = bandwidth else {
            return Ok(base_price);
        };

        let surcharge = match (service.price_per_mbps, service.base_bandwidth) {
            (Some(rate), Some(base)) => {
                rate.amount() * Decimal::from(bandwidth.excess_over(base))
            }
            _ => Decimal::ZERO,
        };

        Ok(base_price + surcharge)
    }
}
