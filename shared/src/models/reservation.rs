//! Reservation model and lifecycle
//!
//! A reservation is a time-boxed hold of one batch by one actor on
//! behalf of one lead or walk-in customer. The lifecycle is strictly
//! one-way; no status is reachable twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default hold duration when the caller does not supply an expiry.
pub const DEFAULT_RESERVATION_TTL_DAYS: i64 = 7;

/// A time-boxed hold of one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// The broker/seller who placed the hold
    pub reserved_by: Uuid,
    pub lead_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Active,
    ConfirmedSale,
    Expired,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::ConfirmedSale => "confirmed_sale",
            ReservationStatus::Expired => "expired",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ReservationStatus::Active),
            "confirmed_sale" => Some(ReservationStatus::ConfirmedSale),
            "expired" => Some(ReservationStatus::Expired),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Only Active can move, and only to a terminal state.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Active, ReservationStatus::ConfirmedSale)
                | (ReservationStatus::Active, ReservationStatus::Expired)
                | (ReservationStatus::Active, ReservationStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self != ReservationStatus::Active
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Reservation {
    /// Logically expired: still Active but past its expiry. A terminal
    /// reservation is never "expired", whatever its timestamp says.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Active && now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reservation(status: ReservationStatus, expires_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            reserved_by: Uuid::new_v4(),
            lead_id: Some(Uuid::new_v4()),
            customer_name: None,
            customer_contact: None,
            status,
            notes: None,
            expires_at,
            is_active: status == ReservationStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_transitions_one_way() {
        use ReservationStatus::*;
        assert!(Active.can_transition_to(ConfirmedSale));
        assert!(Active.can_transition_to(Expired));
        assert!(Active.can_transition_to(Cancelled));

        for terminal in [ConfirmedSale, Expired, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Active, ConfirmedSale, Expired, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert!(reservation(ReservationStatus::Active, past).is_expired_at(now));
        assert!(!reservation(ReservationStatus::Active, future).is_expired_at(now));
        // Terminal statuses are never expired
        assert!(!reservation(ReservationStatus::Cancelled, past).is_expired_at(now));
        assert!(!reservation(ReservationStatus::ConfirmedSale, past).is_expired_at(now));
        assert!(!reservation(ReservationStatus::Expired, past).is_expired_at(now));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for s in [
            ReservationStatus::Active,
            ReservationStatus::ConfirmedSale,
            ReservationStatus::Expired,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ReservationStatus::parse("pending"), None);
    }
}
