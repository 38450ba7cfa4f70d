//! Reservation lifecycle tests
//!
//! Tests for the reservation state machine and expiry semantics:
//! - Property 5: The lifecycle is strictly one-way
//! - Property 6: Terminal reservations are never logically expired
//! - Property 7: The batch release transition mirrors the reservation exit

use proptest::prelude::*;

use chrono::{DateTime, Duration, Utc};
use shared::models::{BatchStatus, Reservation, ReservationStatus};
use uuid::Uuid;

fn sample_reservation(status: ReservationStatus, expires_at: DateTime<Utc>) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        batch_id: Uuid::new_v4(),
        reserved_by: Uuid::new_v4(),
        lead_id: None,
        customer_name: Some("João Pereira".to_string()),
        customer_contact: Some("+55 27 99876-5432".to_string()),
        status,
        notes: None,
        expires_at,
        is_active: status == ReservationStatus::Active,
        created_at: Utc::now(),
    }
}

const ALL_STATUSES: [ReservationStatus; 4] = [
    ReservationStatus::Active,
    ReservationStatus::ConfirmedSale,
    ReservationStatus::Expired,
    ReservationStatus::Cancelled,
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Active can exit to each terminal state exactly once
    #[test]
    fn test_active_exits() {
        use ReservationStatus::*;
        assert!(Active.can_transition_to(ConfirmedSale));
        assert!(Active.can_transition_to(Expired));
        assert!(Active.can_transition_to(Cancelled));
        assert!(!Active.can_transition_to(Active));
    }

    /// No transition leaves a terminal state
    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL_STATUSES.iter().filter(|s| s.is_terminal()) {
            for to in ALL_STATUSES {
                assert!(
                    !from.can_transition_to(to),
                    "{} must not transition to {}",
                    from,
                    to
                );
            }
        }
    }

    /// An active reservation past its expiry is logically expired
    #[test]
    fn test_active_past_expiry_is_expired() {
        let now = Utc::now();
        let r = sample_reservation(ReservationStatus::Active, now - Duration::minutes(1));
        assert!(r.is_expired_at(now));
    }

    /// Expiry boundary: exactly at expires_at is still live
    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let r = sample_reservation(ReservationStatus::Active, now);
        assert!(!r.is_expired_at(now));
    }

    /// A confirmed reservation with a past expiry is not expired
    #[test]
    fn test_confirmed_sale_never_expires() {
        let now = Utc::now();
        let r = sample_reservation(ReservationStatus::ConfirmedSale, now - Duration::days(30));
        assert!(!r.is_expired_at(now));
    }

    /// Expiring or cancelling releases the batch back to available
    #[test]
    fn test_batch_release_is_legal() {
        assert!(BatchStatus::Reserved.can_transition_to(BatchStatus::Available));
    }

    /// Confirming moves the batch to sold, not back to available
    #[test]
    fn test_confirmation_sells_the_batch() {
        assert!(BatchStatus::Reserved.can_transition_to(BatchStatus::Sold));
        assert!(!BatchStatus::Sold.can_transition_to(BatchStatus::Available));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property 5: every legal transition originates from Active
    #[test]
    fn prop_only_active_moves(from_idx in 0usize..4, to_idx in 0usize..4) {
        let from = ALL_STATUSES[from_idx];
        let to = ALL_STATUSES[to_idx];

        if from.can_transition_to(to) {
            prop_assert_eq!(from, ReservationStatus::Active);
            prop_assert!(to.is_terminal());
        }
    }

    /// Property 6: only Active reservations can be logically expired
    #[test]
    fn prop_expired_implies_active(status_idx in 0usize..4, offset_mins in -10_000i64..10_000) {
        let now = Utc::now();
        let status = ALL_STATUSES[status_idx];
        let r = sample_reservation(status, now + Duration::minutes(offset_mins));

        if r.is_expired_at(now) {
            prop_assert_eq!(status, ReservationStatus::Active);
            prop_assert!(now > r.expires_at);
        }
        if status.is_terminal() {
            prop_assert!(!r.is_expired_at(now));
        }
    }

    /// Property 5b: no two-step path re-enters Active
    #[test]
    fn prop_active_unreachable(from_idx in 0usize..4, mid_idx in 0usize..4) {
        let from = ALL_STATUSES[from_idx];
        let mid = ALL_STATUSES[mid_idx];

        if from.can_transition_to(mid) {
            prop_assert!(!mid.can_transition_to(ReservationStatus::Active));
        }
    }
}
