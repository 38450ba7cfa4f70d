//! Sale and commission tests
//!
//! Tests for the sale ledger math:
//! - Property 8: commission = sale price - industry floor, never negative
//! - Property 9: centavo amounts round-trip through the float view

use proptest::prelude::*;

use shared::models::calculate_commission_cents;
use shared::types::{amount_from_float, amount_to_float};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A sale above the floor earns the difference
    #[test]
    fn test_commission_above_floor() {
        // R$ 25.000,00 sale on a R$ 21.600,00 floor
        assert_eq!(
            calculate_commission_cents(2_500_000, 2_160_000),
            Some(340_000)
        );
    }

    /// Selling exactly at the floor earns nothing but is legal
    #[test]
    fn test_commission_at_floor() {
        assert_eq!(calculate_commission_cents(2_160_000, 2_160_000), Some(0));
    }

    /// Selling below the floor is rejected outright
    #[test]
    fn test_commission_below_floor() {
        assert_eq!(calculate_commission_cents(2_159_999, 2_160_000), None);
    }

    /// Centavo conversion on known values
    #[test]
    fn test_amount_conversions() {
        assert_eq!(amount_from_float(450.00), 45_000);
        assert_eq!(amount_from_float(0.01), 1);
        assert!((amount_to_float(45_000) - 450.0).abs() < 1e-9);
    }

    /// Half-up rounding at the centavo boundary
    #[test]
    fn test_amount_rounds_half_up() {
        assert_eq!(amount_from_float(0.005), 1);
        assert_eq!(amount_from_float(0.004), 0);
        assert_eq!(amount_from_float(1.995), 200);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property 8: a granted commission is exactly the spread and never negative
    #[test]
    fn prop_commission_is_spread(price in 0i64..10_000_000_000, floor in 0i64..10_000_000_000) {
        match calculate_commission_cents(price, floor) {
            Some(commission) => {
                prop_assert!(price >= floor);
                prop_assert_eq!(commission, price - floor);
                prop_assert!(commission >= 0);
            }
            None => prop_assert!(price < floor),
        }
    }

    /// Property 9: centavos -> float -> centavos is the identity
    #[test]
    fn prop_amount_round_trip(cents in 0i64..1_000_000_000_000) {
        let as_float = amount_to_float(cents);
        prop_assert_eq!(amount_from_float(as_float), cents);
    }
}
