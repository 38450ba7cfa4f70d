//! Reservation lifecycle service
//!
//! Orchestrates batch locking, state transitions, and ledger writes. All
//! mutating operations run in a single database transaction and take an
//! exclusive row lock on the target batch first; the lock is the sole
//! serialization point between concurrent reservation attempts, sale
//! confirmations, cancellations, and the expiration sweeper. Whoever
//! loses the race for the lock observes the winner's committed state and
//! fails its precondition check instead of corrupting inventory.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::stores;
use crate::stores::reservation::{ActiveReservation, ExpiredCandidate, NewReservation};
use crate::stores::sale::NewSale;
use shared::models::{
    calculate_commission_cents, BatchStatus, Reservation, ReservationStatus, Sale,
};
use shared::types::amount_from_float;

/// Reservation lifecycle service
#[derive(Clone)]
pub struct ReservationService {
    db: PgPool,
    default_ttl_days: i64,
}

/// Input for creating a reservation
#[derive(Debug, Deserialize)]
pub struct CreateReservationInput {
    pub batch_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub notes: Option<String>,
    /// Explicit expiry; must be in the future. Defaults to now + 7 days.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for confirming a reservation into a sale
#[derive(Debug, Deserialize)]
pub struct ConfirmSaleInput {
    /// Final agreed price for the whole batch
    pub final_sold_price: f64,
    pub invoice_url: Option<String>,
    pub notes: Option<String>,
    pub sale_date: Option<chrono::NaiveDate>,
}

/// Result of one expiration sweep
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExpirationSweep {
    /// Reservations successfully transitioned to expired
    pub expired: usize,
    /// Candidates found by the scan (includes rows another transaction
    /// beat the sweep to)
    pub candidates: usize,
}

impl ReservationService {
    /// Create a new ReservationService instance
    pub fn new(db: PgPool, default_ttl_days: i64) -> Self {
        Self {
            db,
            default_ttl_days,
        }
    }

    /// Reserve a batch for a lead or walk-in customer.
    ///
    /// Protocol: lock the batch row, re-check availability under the
    /// lock, transition the batch to reserved, insert the active
    /// reservation, commit. Any failure rolls the whole unit back, so a
    /// partial reservation is never visible.
    pub async fn create(
        &self,
        actor_id: Uuid,
        input: CreateReservationInput,
    ) -> AppResult<Reservation> {
        validate_customer_fields(
            input.lead_id,
            input.customer_name.as_deref(),
            input.customer_contact.as_deref(),
        )?;

        let now = Utc::now();
        let expires_at = resolve_expiry(input.expires_at, now, self.default_ttl_days)?;

        if let Some(lead_id) = input.lead_id {
            let lead_exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM leads WHERE id = $1)")
                    .bind(lead_id)
                    .fetch_one(&self.db)
                    .await?;
            if !lead_exists {
                return Err(AppError::NotFound("Lead".to_string()));
            }
        }

        let mut tx = self.db.begin().await?;

        let batch = stores::batch::find_by_id_for_update(&mut tx, input.batch_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        // The re-check under the lock is what closes the check-then-act
        // race between concurrent callers.
        if !batch.is_available() {
            return Err(AppError::BatchNotAvailable(format!(
                "Batch {} is not available for reservation",
                batch.code
            )));
        }

        stores::batch::update_status_tx(&mut tx, batch.id, BatchStatus::Reserved).await?;

        let reservation = stores::reservation::insert_tx(
            &mut tx,
            &NewReservation {
                batch_id: batch.id,
                reserved_by: actor_id,
                lead_id: input.lead_id,
                customer_name: input.customer_name,
                customer_contact: input.customer_contact,
                notes: input.notes,
                expires_at,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.id,
            batch_id = %batch.id,
            actor_id = %actor_id,
            expires_at = %expires_at,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Cancel an active reservation, returning the batch to available.
    pub async fn cancel(&self, id: Uuid) -> AppResult<()> {
        let existing = stores::reservation::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;

        if existing.status != ReservationStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Reservation is {}; only active reservations can be cancelled",
                existing.status
            )));
        }

        let mut tx = self.db.begin().await?;

        let batch = stores::batch::find_by_id_for_update(&mut tx, existing.batch_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        // Re-read under the lock: a concurrent confirm or sweep may have
        // moved the reservation since the precondition check.
        let reservation = stores::reservation::find_by_id_tx(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;
        if reservation.status != ReservationStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Reservation is {}; only active reservations can be cancelled",
                reservation.status
            )));
        }

        if !batch.status.can_transition_to(BatchStatus::Available) {
            return Err(AppError::InvalidStateTransition(format!(
                "Batch cannot move from {} back to available",
                batch.status
            )));
        }

        stores::reservation::cancel_tx(&mut tx, id).await?;
        stores::batch::update_status_tx(&mut tx, batch.id, BatchStatus::Available).await?;

        tx.commit().await?;

        tracing::info!(reservation_id = %id, batch_id = %batch.id, "Reservation cancelled");

        Ok(())
    }

    /// Confirm an active reservation into a sale.
    ///
    /// Inserts the immutable sale record, moves the batch to sold and
    /// the reservation to confirmed_sale as one atomic unit. The net
    /// industry value is the batch's asking price read under the lock at
    /// confirmation time.
    pub async fn confirm_sale(
        &self,
        reservation_id: Uuid,
        actor_id: Uuid,
        input: ConfirmSaleInput,
    ) -> AppResult<Sale> {
        let now = Utc::now();

        let existing = stores::reservation::find_by_id(&self.db, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;

        if existing.status != ReservationStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Reservation is {}; only active reservations can be confirmed",
                existing.status
            )));
        }
        // An expired-but-not-yet-swept reservation must not be confirmable.
        if existing.is_expired_at(now) {
            return Err(AppError::ReservationExpired(format!(
                "Reservation {} expired at {}",
                reservation_id, existing.expires_at
            )));
        }

        let sale_price_cents = amount_from_float(input.final_sold_price);

        let mut tx = self.db.begin().await?;

        let batch = stores::batch::find_by_id_for_update(&mut tx, existing.batch_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let reservation = stores::reservation::find_by_id_tx(&mut tx, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;
        if reservation.status != ReservationStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Reservation is {}; only active reservations can be confirmed",
                reservation.status
            )));
        }
        if reservation.is_expired_at(now) {
            return Err(AppError::ReservationExpired(format!(
                "Reservation {} expired at {}",
                reservation_id, reservation.expires_at
            )));
        }
        if !batch.status.can_transition_to(BatchStatus::Sold) {
            return Err(AppError::InvalidStateTransition(format!(
                "Batch cannot move from {} to sold",
                batch.status
            )));
        }

        let net_industry_value_cents = batch.industry_price_cents;
        let broker_commission_cents =
            calculate_commission_cents(sale_price_cents, net_industry_value_cents).ok_or_else(
                || {
                    AppError::InvalidPrice(format!(
                        "Final price {:.2} is below the industry value {:.2}",
                        input.final_sold_price,
                        shared::types::amount_to_float(net_industry_value_cents)
                    ))
                },
            )?;

        // Customer data comes from the linked lead when present.
        let (customer_name, customer_contact) = match reservation.lead_id {
            Some(lead_id) => {
                sqlx::query_as::<_, (String, String)>(
                    "SELECT name, contact FROM leads WHERE id = $1",
                )
                .bind(lead_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Lead".to_string()))?
            }
            None => (
                reservation.customer_name.clone().unwrap_or_default(),
                reservation.customer_contact.clone().unwrap_or_default(),
            ),
        };

        let sale = stores::sale::insert_tx(
            &mut tx,
            &NewSale {
                batch_id: batch.id,
                reservation_id: reservation.id,
                sold_by: actor_id,
                industry_id: batch.industry_id,
                lead_id: reservation.lead_id,
                customer_name,
                customer_contact,
                sale_price_cents,
                broker_commission_cents,
                net_industry_value_cents,
                invoice_url: input.invoice_url,
                notes: input.notes,
                sale_date: input.sale_date.unwrap_or_else(|| now.date_naive()),
            },
        )
        .await?;

        stores::batch::update_status_tx(&mut tx, batch.id, BatchStatus::Sold).await?;
        // The whole batch goes with the sale; nothing is left to offer.
        stores::batch::update_slab_counts(&mut tx, batch.id, batch.quantity_slabs, 0).await?;
        stores::reservation::update_status_tx(
            &mut tx,
            reservation.id,
            ReservationStatus::ConfirmedSale,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            sale_id = %sale.id,
            reservation_id = %reservation.id,
            batch_id = %batch.id,
            commission_cents = broker_commission_cents,
            "Sale confirmed"
        );

        Ok(sale)
    }

    /// Active reservations for an actor, enriched with batch and lead
    /// data. Read-only.
    pub async fn list_active(&self, actor_id: Uuid) -> AppResult<Vec<ActiveReservation>> {
        stores::reservation::find_active(&self.db, actor_id).await
    }

    /// Expire all stale reservations and release their batches.
    ///
    /// Each candidate is swept in its own transaction so one failure
    /// cannot block the rest. Safe to run on an overlapping schedule: a
    /// reservation confirmed or cancelled concurrently simply no longer
    /// matches the active filter and is skipped.
    pub async fn expire_reservations(&self) -> AppResult<ExpirationSweep> {
        let now = Utc::now();
        let candidates = stores::reservation::find_expired(&self.db, now).await?;
        let total = candidates.len();
        let mut expired = 0usize;

        for candidate in candidates {
            match self.expire_one(candidate, now).await {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        reservation_id = %candidate.reservation_id,
                        error = %e,
                        "Failed to expire reservation, continuing sweep"
                    );
                }
            }
        }

        tracing::info!(expired, candidates = total, "Expiration sweep finished");

        Ok(ExpirationSweep {
            expired,
            candidates: total,
        })
    }

    /// Expire a single reservation in its own transaction. Returns false
    /// when the reservation stopped being a candidate before the lock
    /// was acquired.
    async fn expire_one(&self, candidate: ExpiredCandidate, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        let batch = stores::batch::find_by_id_for_update(&mut tx, candidate.batch_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let reservation = stores::reservation::find_by_id_tx(&mut tx, candidate.reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;

        if !reservation.is_expired_at(now) {
            // Confirmed or cancelled while we waited for the lock.
            return Ok(false);
        }

        stores::reservation::update_status_tx(&mut tx, reservation.id, ReservationStatus::Expired)
            .await?;
        stores::batch::update_status_tx(&mut tx, batch.id, BatchStatus::Available).await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.id,
            batch_id = %batch.id,
            "Reservation expired"
        );

        Ok(true)
    }
}

/// Exactly one of lead or walk-in customer data must be supplied.
pub fn validate_customer_fields(
    lead_id: Option<Uuid>,
    customer_name: Option<&str>,
    customer_contact: Option<&str>,
) -> AppResult<()> {
    let has_customer = customer_name.is_some() || customer_contact.is_some();

    if lead_id.is_some() && has_customer {
        return Err(AppError::Validation {
            field: "lead_id".to_string(),
            message: "Supply either a lead or customer data, not both".to_string(),
            message_pt: "Informe um lead ou os dados do cliente, não ambos".to_string(),
        });
    }
    if lead_id.is_none() && !(customer_name.is_some() && customer_contact.is_some()) {
        return Err(AppError::Validation {
            field: "customer_name".to_string(),
            message: "Either a lead or both customer name and contact are required".to_string(),
            message_pt: "É necessário um lead ou nome e contato do cliente".to_string(),
        });
    }
    Ok(())
}

/// Resolve the reservation expiry: an explicit timestamp must be in the
/// future; absent one, the default TTL applies.
pub fn resolve_expiry(
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    default_ttl_days: i64,
) -> AppResult<DateTime<Utc>> {
    match requested {
        Some(t) if t <= now => Err(AppError::Validation {
            field: "expires_at".to_string(),
            message: "Expiry must be in the future".to_string(),
            message_pt: "A expiração deve estar no futuro".to_string(),
        }),
        Some(t) => Ok(t),
        None => Ok(now + Duration::days(default_ttl_days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_fields_accept_lead_only() {
        assert!(validate_customer_fields(Some(Uuid::new_v4()), None, None).is_ok());
    }

    #[test]
    fn customer_fields_accept_walk_in_customer() {
        assert!(validate_customer_fields(None, Some("Maria"), Some("+55 11 91234-5678")).is_ok());
    }

    #[test]
    fn customer_fields_reject_both_lead_and_customer() {
        let result = validate_customer_fields(Some(Uuid::new_v4()), Some("Maria"), None);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn customer_fields_reject_neither() {
        let result = validate_customer_fields(None, None, None);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn customer_fields_reject_partial_walk_in() {
        let result = validate_customer_fields(None, Some("Maria"), None);
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let result = validate_customer_fields(None, None, Some("+55 11 91234-5678"));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn expiry_defaults_to_ttl() {
        let now = Utc::now();
        let expiry = resolve_expiry(None, now, 7).unwrap();
        assert_eq!(expiry, now + Duration::days(7));
    }

    #[test]
    fn explicit_future_expiry_is_kept() {
        let now = Utc::now();
        let requested = now + Duration::hours(48);
        assert_eq!(resolve_expiry(Some(requested), now, 7).unwrap(), requested);
    }

    #[test]
    fn past_expiry_is_rejected() {
        let now = Utc::now();
        let result = resolve_expiry(Some(now - Duration::seconds(1)), now, 7);
        assert!(matches!(result, Err(AppError::Validation { .. })));

        // Exactly now is also too late
        let result = resolve_expiry(Some(now), now, 7);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
