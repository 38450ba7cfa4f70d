//! Batch inventory tests
//!
//! Tests for the batch availability state machine and pricing:
//! - Property 1: Availability requires active status and free slabs
//! - Property 2: Status transitions follow the enumerated machine
//! - Property 3: Price unit conversion round-trips
//! - Property 4: Total area scales linearly with quantity

use proptest::prelude::*;

use chrono::Utc;
use shared::models::{calculate_total_area, Batch, BatchStatus};
use shared::types::{convert_price, PriceUnit, SQFT_PER_SQM};
use uuid::Uuid;

fn sample_batch(status: BatchStatus, is_active: bool, available_slabs: i32) -> Batch {
    Batch {
        id: Uuid::new_v4(),
        industry_id: Uuid::new_v4(),
        code: "BR-QTZ-0042".to_string(),
        material: "Quartzito Taj Mahal".to_string(),
        height_cm: 320.0,
        width_cm: 190.0,
        thickness_cm: 3.0,
        quantity_slabs: 8,
        available_slabs,
        industry_price_cents: 95_000,
        price_unit: PriceUnit::M2,
        total_area_m2: calculate_total_area(320.0, 190.0, 8),
        status,
        is_active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// An available, active batch with free slabs can be reserved
    #[test]
    fn test_availability_predicate() {
        assert!(sample_batch(BatchStatus::Available, true, 8).is_available());
    }

    /// A reserved batch cannot be reserved again
    #[test]
    fn test_reserved_batch_not_available() {
        assert!(!sample_batch(BatchStatus::Reserved, true, 8).is_available());
    }

    /// An archived batch is never available, whatever its status says
    #[test]
    fn test_inactive_batch_not_available() {
        assert!(!sample_batch(BatchStatus::Available, false, 8).is_available());
    }

    /// Zero free slabs means not available even in available status
    #[test]
    fn test_empty_batch_not_available() {
        assert!(!sample_batch(BatchStatus::Available, true, 0).is_available());
    }

    /// Sold is a dead end in the batch state machine
    #[test]
    fn test_sold_is_terminal() {
        use BatchStatus::*;
        for next in [Available, Reserved, Sold, Inactive] {
            assert!(!Sold.can_transition_to(next));
        }
    }

    /// The only way into Sold is through Reserved
    #[test]
    fn test_sold_only_reachable_from_reserved() {
        use BatchStatus::*;
        assert!(Reserved.can_transition_to(Sold));
        assert!(!Available.can_transition_to(Sold));
        assert!(!Inactive.can_transition_to(Sold));
    }

    /// Cancelling or expiring a reservation releases the batch
    #[test]
    fn test_reserved_can_release() {
        assert!(BatchStatus::Reserved.can_transition_to(BatchStatus::Available));
    }

    /// 320cm x 190cm x 8 slabs = 486400 cm² = 48.64 m²
    #[test]
    fn test_total_area_known_value() {
        let b = sample_batch(BatchStatus::Available, true, 8);
        assert!((b.total_area() - 48.64).abs() < 1e-9);
    }

    /// M2 -> FT2 divides by the conversion factor
    #[test]
    fn test_m2_to_ft2_conversion() {
        let per_ft2 = convert_price(1076.391_042, PriceUnit::M2, PriceUnit::Ft2);
        assert!((per_ft2 - 100.0).abs() < 1e-6);
    }

    /// Converting to the same unit is the identity
    #[test]
    fn test_same_unit_conversion_is_identity() {
        assert_eq!(convert_price(450.0, PriceUnit::M2, PriceUnit::M2), 450.0);
        assert_eq!(convert_price(450.0, PriceUnit::Ft2, PriceUnit::Ft2), 450.0);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property 1: availability implies active + available status + free slabs
    #[test]
    fn prop_availability_requires_all_three(
        active in any::<bool>(),
        available in 0i32..100,
        status_idx in 0usize..4,
    ) {
        let status = [
            BatchStatus::Available,
            BatchStatus::Reserved,
            BatchStatus::Sold,
            BatchStatus::Inactive,
        ][status_idx];
        let b = sample_batch(status, active, available);

        let expected = active && status == BatchStatus::Available && available > 0;
        prop_assert_eq!(b.is_available(), expected);
    }

    /// Property 3: M2 -> FT2 -> M2 round-trips within float tolerance
    #[test]
    fn prop_price_conversion_round_trip(price in 0.01f64..1_000_000.0) {
        let ft2 = convert_price(price, PriceUnit::M2, PriceUnit::Ft2);
        let back = convert_price(ft2, PriceUnit::Ft2, PriceUnit::M2);
        prop_assert!((back - price).abs() < 1e-6 * price.max(1.0));
    }

    /// Property 3b: a square metre always costs more than a square foot
    #[test]
    fn prop_ft2_price_is_smaller(price in 0.01f64..1_000_000.0) {
        let ft2 = convert_price(price, PriceUnit::M2, PriceUnit::Ft2);
        prop_assert!(ft2 < price);
        prop_assert!((ft2 * SQFT_PER_SQM - price).abs() < 1e-6 * price.max(1.0));
    }

    /// Property 4: total area scales linearly with slab count
    #[test]
    fn prop_total_area_linear_in_quantity(
        height in 1.0f64..1000.0,
        width in 1.0f64..1000.0,
        qty in 1i32..500,
    ) {
        let one = calculate_total_area(height, width, 1);
        let many = calculate_total_area(height, width, qty);
        prop_assert!((many - one * qty as f64).abs() < 1e-6 * many.max(1.0));
        prop_assert!(many > 0.0);
    }
}
