//! Sale model
//!
//! A sale is the immutable ledger record produced when a reservation is
//! confirmed. It is created exactly once, inside the same transaction
//! that transitions the batch and reservation, and never updated or
//! deleted afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a completed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// The reservation this sale terminated
    pub reservation_id: Uuid,
    pub sold_by: Uuid,
    pub industry_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_contact: String,
    /// Final agreed price, in centavos
    pub sale_price_cents: i64,
    /// sale_price - net_industry_value, stored for audit
    pub broker_commission_cents: i64,
    /// Industry asking price captured at confirmation time
    pub net_industry_value_cents: i64,
    pub invoice_url: Option<String>,
    pub notes: Option<String>,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Broker commission for a given final price and industry floor.
///
/// Returns None when the price is below the floor (commission cannot be
/// negative); callers reject that case before writing anything.
pub fn calculate_commission_cents(sale_price_cents: i64, net_industry_value_cents: i64) -> Option<i64> {
    if sale_price_cents < net_industry_value_cents {
        return None;
    }
    Some(sale_price_cents - net_industry_value_cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_happy_path() {
        // 500.00 sale on a 400.00 floor -> 100.00 commission
        assert_eq!(calculate_commission_cents(50_000, 40_000), Some(10_000));
    }

    #[test]
    fn test_commission_at_floor_is_zero() {
        assert_eq!(calculate_commission_cents(40_000, 40_000), Some(0));
    }

    #[test]
    fn test_commission_below_floor_rejected() {
        assert_eq!(calculate_commission_cents(30_000, 40_000), None);
    }
}
