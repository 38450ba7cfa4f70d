//! Reservation lifecycle tests against a real Postgres database
//!
//! Each test gets its own migrated database via `#[sqlx::test]`. Covered
//! here is the half of the lifecycle the pure-logic suites cannot reach:
//! - mutual exclusion: N concurrent creates on one batch admit exactly one
//! - confirmation is atomic: a rejected confirm leaves no partial writes,
//!   a committed confirm moves all three records together and is final
//! - the expiration sweep is idempotent and releases batches for reuse
//! - cancellation releases the batch without touching slab counts

use sqlx::PgPool;
use uuid::Uuid;

use shared::models::ReservationStatus;
use slab_marketplace_backend::error::AppError;
use slab_marketplace_backend::services::reservation::{ConfirmSaleInput, CreateReservationInput};
use slab_marketplace_backend::services::ReservationService;

const DEFAULT_TTL_DAYS: i64 = 7;

async fn seed_industry(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO industries (name, code) VALUES ('Granitos Cachoeiro', 'GRC') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("seed industry")
}

async fn seed_broker(pool: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role) \
         VALUES ('Ana Corretor', $1, 'not-a-real-hash', 'broker') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("seed broker")
}

/// 8 slabs of Taj Mahal at R$ 21.600,00 for the whole batch floor.
async fn seed_batch(pool: &PgPool, industry_id: Uuid, code: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO batches (industry_id, code, material, height_cm, width_cm, thickness_cm, \
         quantity_slabs, available_slabs, industry_price_cents, total_area_m2) \
         VALUES ($1, $2, 'Quartzito Taj Mahal', 320, 190, 3, 8, 8, 2160000, 48.64) RETURNING id",
    )
    .bind(industry_id)
    .bind(code)
    .fetch_one(pool)
    .await
    .expect("seed batch")
}

fn walk_in(batch_id: Uuid) -> CreateReservationInput {
    CreateReservationInput {
        batch_id,
        lead_id: None,
        customer_name: Some("Maria Souza".to_string()),
        customer_contact: Some("maria@example.com".to_string()),
        notes: None,
        expires_at: None,
    }
}

fn offer(final_sold_price: f64) -> ConfirmSaleInput {
    ConfirmSaleInput {
        final_sold_price,
        invoice_url: None,
        notes: None,
        sale_date: None,
    }
}

async fn batch_state(pool: &PgPool, id: Uuid) -> (String, i32) {
    sqlx::query_as("SELECT status, available_slabs FROM batches WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("batch row")
}

async fn reservation_status(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status FROM reservations WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("reservation row")
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_creates_reserve_a_batch_exactly_once(pool: PgPool) {
    let industry = seed_industry(&pool).await;
    let batch = seed_batch(&pool, industry, "TAJ-001").await;
    let service = ReservationService::new(pool.clone(), DEFAULT_TTL_DAYS);

    let mut handles = Vec::new();
    for i in 0..8 {
        let broker = seed_broker(&pool, &format!("broker{i}@example.com")).await;
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create(broker, walk_in(batch)).await
        }));
    }

    let mut won = 0;
    let mut lost = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => won += 1,
            Err(AppError::BatchNotAvailable(_)) => lost += 1,
            Err(e) => panic!("unexpected error from losing create: {e}"),
        }
    }
    assert_eq!(won, 1);
    assert_eq!(lost, 7);

    let (status, _) = batch_state(&pool, batch).await;
    assert_eq!(status, "reserved");

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservations WHERE batch_id = $1 AND status = 'active'",
    )
    .bind(batch)
    .fetch_one(&pool)
    .await
    .expect("count");
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn confirm_sale_is_atomic_and_final(pool: PgPool) {
    let industry = seed_industry(&pool).await;
    let batch = seed_batch(&pool, industry, "TAJ-002").await;
    let broker = seed_broker(&pool, "broker@example.com").await;
    let service = ReservationService::new(pool.clone(), DEFAULT_TTL_DAYS);

    let reservation = service.create(broker, walk_in(batch)).await.expect("create");

    // Below the industry floor: rejected, and the rollback leaves no trace
    let rejected = service
        .confirm_sale(reservation.id, broker, offer(20_000.0))
        .await;
    assert!(matches!(rejected, Err(AppError::InvalidPrice(_))));

    let (status, _) = batch_state(&pool, batch).await;
    assert_eq!(status, "reserved");
    assert_eq!(reservation_status(&pool, reservation.id).await, "active");
    let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE reservation_id = $1")
        .bind(reservation.id)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(sales, 0);

    // Above the floor: sale, batch and reservation move together
    let sale = service
        .confirm_sale(reservation.id, broker, offer(25_000.0))
        .await
        .expect("confirm");
    assert_eq!(sale.sale_price_cents, 2_500_000);
    assert_eq!(sale.broker_commission_cents, 340_000);
    assert_eq!(sale.net_industry_value_cents, 2_160_000);

    let (status, available) = batch_state(&pool, batch).await;
    assert_eq!(status, "sold");
    assert_eq!(available, 0);
    assert_eq!(
        reservation_status(&pool, reservation.id).await,
        "confirmed_sale"
    );

    // Confirmed is terminal: neither a second confirm nor a cancel may touch it
    let again = service
        .confirm_sale(reservation.id, broker, offer(25_000.0))
        .await;
    assert!(matches!(again, Err(AppError::InvalidStateTransition(_))));
    let cancel = service.cancel(reservation.id).await;
    assert!(matches!(cancel, Err(AppError::InvalidStateTransition(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn expiration_sweep_is_idempotent_and_releases_the_batch(pool: PgPool) {
    let industry = seed_industry(&pool).await;
    let batch = seed_batch(&pool, industry, "TAJ-003").await;
    let broker = seed_broker(&pool, "broker@example.com").await;
    let service = ReservationService::new(pool.clone(), DEFAULT_TTL_DAYS);

    let reservation = service.create(broker, walk_in(batch)).await.expect("create");

    sqlx::query("UPDATE reservations SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(reservation.id)
        .execute(&pool)
        .await
        .expect("backdate expiry");

    let first = service.expire_reservations().await.expect("first sweep");
    assert_eq!(first.candidates, 1);
    assert_eq!(first.expired, 1);

    // A second pass finds nothing; expired is terminal
    let second = service.expire_reservations().await.expect("second sweep");
    assert_eq!(second.candidates, 0);
    assert_eq!(second.expired, 0);

    assert_eq!(reservation_status(&pool, reservation.id).await, "expired");
    let (status, _) = batch_state(&pool, batch).await;
    assert_eq!(status, "available");

    // The released batch is reservable again
    let again = service.create(broker, walk_in(batch)).await.expect("re-reserve");
    assert_eq!(again.status, ReservationStatus::Active);
}

#[sqlx::test(migrations = "./migrations")]
async fn cancel_releases_batch_without_touching_slab_counts(pool: PgPool) {
    let industry = seed_industry(&pool).await;
    let batch = seed_batch(&pool, industry, "TAJ-004").await;
    let broker = seed_broker(&pool, "broker@example.com").await;
    let service = ReservationService::new(pool.clone(), DEFAULT_TTL_DAYS);

    let reservation = service.create(broker, walk_in(batch)).await.expect("create");
    service.cancel(reservation.id).await.expect("cancel");

    let (status, available) = batch_state(&pool, batch).await;
    assert_eq!(status, "available");
    assert_eq!(available, 8);
    assert_eq!(reservation_status(&pool, reservation.id).await, "cancelled");

    // Cancelled is terminal
    let again = service.cancel(reservation.id).await;
    assert!(matches!(again, Err(AppError::InvalidStateTransition(_))));
}
