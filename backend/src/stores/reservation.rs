//! Reservation store

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Reservation, ReservationStatus};

const RESERVATION_COLUMNS: &str = "id, batch_id, reserved_by, lead_id, customer_name, \
     customer_contact, status, notes, expires_at, is_active, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    batch_id: Uuid,
    reserved_by: Uuid,
    lead_id: Option<Uuid>,
    customer_name: Option<String>,
    customer_contact: Option<String>,
    status: String,
    notes: Option<String>,
    expires_at: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ReservationRow {
    fn into_model(self) -> AppResult<Reservation> {
        let status = ReservationStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown reservation status: {}", self.status))
        })?;
        Ok(Reservation {
            id: self.id,
            batch_id: self.batch_id,
            reserved_by: self.reserved_by,
            lead_id: self.lead_id,
            customer_name: self.customer_name,
            customer_contact: self.customer_contact,
            status,
            notes: self.notes,
            expires_at: self.expires_at,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Fields for inserting a new reservation
#[derive(Debug)]
pub struct NewReservation {
    pub batch_id: Uuid,
    pub reserved_by: Uuid,
    pub lead_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub notes: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Active reservation enriched with batch and lead data for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActiveReservation {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub batch_code: String,
    pub batch_material: String,
    pub industry_price_cents: i64,
    pub lead_id: Option<Uuid>,
    pub lead_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub notes: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A sweep candidate: an active reservation past its expiry
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ExpiredCandidate {
    pub reservation_id: Uuid,
    pub batch_id: Uuid,
}

/// Insert an active reservation inside the caller's transaction. Only
/// the transaction that holds the batch row lock may call this.
pub async fn insert_tx(conn: &mut PgConnection, new: &NewReservation) -> AppResult<Reservation> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
        INSERT INTO reservations (
            batch_id, reserved_by, lead_id, customer_name, customer_contact, notes, expires_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(new.batch_id)
    .bind(new.reserved_by)
    .bind(new.lead_id)
    .bind(&new.customer_name)
    .bind(&new.customer_contact)
    .bind(&new.notes)
    .bind(new.expires_at)
    .fetch_one(&mut *conn)
    .await?;

    row.into_model()
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(ReservationRow::into_model).transpose()
}

/// Re-read inside a transaction, after the batch lock has been taken.
pub async fn find_by_id_tx(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, ReservationRow>(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(ReservationRow::into_model).transpose()
}

/// Active reservations for an actor, enriched with batch and lead data.
/// Read-through only; not part of the consistency-critical path.
pub async fn find_active(pool: &PgPool, actor_id: Uuid) -> AppResult<Vec<ActiveReservation>> {
    let rows = sqlx::query_as::<_, ActiveReservation>(
        r#"
        SELECT r.id, r.batch_id, b.code AS batch_code, b.material AS batch_material,
               b.industry_price_cents, r.lead_id, l.name AS lead_name,
               r.customer_name, r.customer_contact, r.notes, r.expires_at, r.created_at
        FROM reservations r
        JOIN batches b ON b.id = r.batch_id
        LEFT JOIN leads l ON l.id = r.lead_id
        WHERE r.reserved_by = $1 AND r.status = 'active'
        ORDER BY r.expires_at ASC
        "#,
    )
    .bind(actor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All active reservations past their expiry as of `now`.
pub async fn find_expired(pool: &PgPool, now: DateTime<Utc>) -> AppResult<Vec<ExpiredCandidate>> {
    let rows = sqlx::query_as::<_, ExpiredCandidate>(
        r#"
        SELECT id AS reservation_id, batch_id
        FROM reservations
        WHERE status = 'active' AND expires_at < $1
        ORDER BY expires_at ASC
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Status update inside a caller-owned transaction. Terminal statuses
/// also clear the active flag.
pub async fn update_status_tx(
    conn: &mut PgConnection,
    id: Uuid,
    status: ReservationStatus,
) -> AppResult<()> {
    let result = sqlx::query("UPDATE reservations SET status = $1, is_active = $2 WHERE id = $3")
        .bind(status.as_str())
        .bind(!status.is_terminal())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Reservation".to_string()));
    }
    Ok(())
}

/// Mark a reservation cancelled inside the caller's transaction.
pub async fn cancel_tx(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
    update_status_tx(conn, id, ReservationStatus::Cancelled).await
}
