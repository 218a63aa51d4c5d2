//! Pricing and numbering property tests.
//!
//! Property-based checks over the tiered pricing model and order-number
//! formatting, complementing the example-based unit tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use provisioning_engine::{
    Bandwidth, CatalogRules, Money, OrderNumber, PricingCalculator, ServiceDefinition, ServiceId,
    ServiceType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn service(base_mbps: u32, rate_cents: i64) -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("svc-prop"),
        name: "Property Fiber".to_string(),
        description: None,
        service_type: ServiceType::Fiber,
        base_bandwidth: Some(Bandwidth::new(base_mbps)),
        min_bandwidth: Some(Bandwidth::new(1)),
        max_bandwidth: Some(Bandwidth::new(100_000)),
        base_price_monthly: Some(Money::new(dec!(299.00))),
        price_per_mbps: Some(Money::new(Decimal::new(rate_cents, 2))),
        setup_fee: Some(Money::new(dec!(150.00))),
        contract_term_months: Some(12),
        bandwidth_adjustable: true,
        available: true,
        provisioning_time_hours: Some(24),
    }
}

proptest! {
    #[test]
    fn monthly_cost_never_below_base_price(mbps in 1u32..100_000) {
        let svc = service(500, 50);
        let cost = PricingCalculator::monthly_cost(&svc, Some(Bandwidth::new(mbps))).unwrap();
        prop_assert!(cost >= Money::new(dec!(299.00)));
    }

    #[test]
    fn monthly_cost_is_monotone_in_bandwidth(a in 1u32..100_000, b in 1u32..100_000) {
        let svc = service(500, 50);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let cost_lo = PricingCalculator::monthly_cost(&svc, Some(Bandwidth::new(lo))).unwrap();
        let cost_hi = PricingCalculator::monthly_cost(&svc, Some(Bandwidth::new(hi))).unwrap();
        prop_assert!(cost_lo <= cost_hi);
    }

    #[test]
    fn below_base_bills_exactly_the_floor(mbps in 1u32..=500) {
        let svc = service(500, 50);
        let cost = PricingCalculator::monthly_cost(&svc, Some(Bandwidth::new(mbps))).unwrap();
        prop_assert_eq!(cost.amount(), dec!(299.00));
    }

    #[test]
    fn modification_delta_is_antisymmetric(a in 1u32..100_000, b in 1u32..100_000) {
        let svc = service(500, 37);
        let forward = PricingCalculator::modification_delta(
            &svc,
            Some(Bandwidth::new(a)),
            Some(Bandwidth::new(b)),
        )
        .unwrap();
        let backward = PricingCalculator::modification_delta(
            &svc,
            Some(Bandwidth::new(b)),
            Some(Bandwidth::new(a)),
        )
        .unwrap();
        prop_assert_eq!(forward, -backward);
    }

    #[test]
    fn new_service_total_is_monthly_plus_setup(mbps in 1u32..100_000) {
        let svc = service(500, 50);
        let monthly = PricingCalculator::monthly_cost(&svc, Some(Bandwidth::new(mbps))).unwrap();
        let total = PricingCalculator::new_service_total(&svc, Some(Bandwidth::new(mbps))).unwrap();
        prop_assert_eq!(total, monthly + Money::new(dec!(150.00)));
    }

    #[test]
    fn bounds_check_matches_interval(mbps in 1u32..200_000) {
        let svc = service(500, 50);
        let valid = CatalogRules::is_valid_bandwidth(&svc, Some(Bandwidth::new(mbps)));
        prop_assert_eq!(valid, (1..=100_000).contains(&mbps));
    }

    #[test]
    fn order_number_roundtrips_through_format(seq in 1u32..10_000_000) {
        let number = OrderNumber::from_sequence(seq);
        prop_assert!(number.as_str().starts_with("ORD-"));
        prop_assert_eq!(number.sequence(), Some(seq));
    }
}
