//! Batch store: reads, the locking read, and invariant-preserving mutators

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Batch, BatchStatus};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta, PriceUnit};

const BATCH_COLUMNS: &str = "id, industry_id, code, material, height_cm, width_cm, thickness_cm, \
     quantity_slabs, available_slabs, industry_price_cents, price_unit, total_area_m2, \
     status, is_active, created_at, updated_at";

/// Row as stored; statuses are parsed into closed enums on the way out.
#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    industry_id: Uuid,
    code: String,
    material: String,
    height_cm: f64,
    width_cm: f64,
    thickness_cm: f64,
    quantity_slabs: i32,
    available_slabs: i32,
    industry_price_cents: i64,
    price_unit: String,
    total_area_m2: f64,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BatchRow {
    fn into_model(self) -> AppResult<Batch> {
        let status = BatchStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown batch status: {}", self.status)))?;
        let price_unit = PriceUnit::parse(&self.price_unit)
            .ok_or_else(|| AppError::Internal(format!("Unknown price unit: {}", self.price_unit)))?;
        Ok(Batch {
            id: self.id,
            industry_id: self.industry_id,
            code: self.code,
            material: self.material,
            height_cm: self.height_cm,
            width_cm: self.width_cm,
            thickness_cm: self.thickness_cm,
            quantity_slabs: self.quantity_slabs,
            available_slabs: self.available_slabs,
            industry_price_cents: self.industry_price_cents,
            price_unit,
            total_area_m2: self.total_area_m2,
            status,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields for inserting a new batch
#[derive(Debug)]
pub struct NewBatch {
    pub industry_id: Uuid,
    pub code: String,
    pub material: String,
    pub height_cm: f64,
    pub width_cm: f64,
    pub thickness_cm: f64,
    pub quantity_slabs: i32,
    pub industry_price_cents: i64,
    pub price_unit: PriceUnit,
    pub total_area_m2: f64,
}

/// Full replacement values for an update; the service merges and
/// recomputes derived fields before calling in.
#[derive(Debug)]
pub struct BatchUpdate {
    pub material: String,
    pub height_cm: f64,
    pub width_cm: f64,
    pub thickness_cm: f64,
    pub quantity_slabs: i32,
    pub available_slabs: i32,
    pub industry_price_cents: i64,
    pub price_unit: PriceUnit,
    pub total_area_m2: f64,
}

/// Filters for listing batches
#[derive(Debug, Default)]
pub struct BatchFilters {
    pub industry_id: Option<Uuid>,
    pub status: Option<BatchStatus>,
    pub material: Option<String>,
}

/// Insert a new batch with a full complement of available slabs.
pub async fn insert(pool: &PgPool, new: &NewBatch) -> AppResult<Batch> {
    let row = sqlx::query_as::<_, BatchRow>(&format!(
        r#"
        INSERT INTO batches (
            industry_id, code, material, height_cm, width_cm, thickness_cm,
            quantity_slabs, available_slabs, industry_price_cents, price_unit, total_area_m2
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $9, $10)
        RETURNING {BATCH_COLUMNS}
        "#
    ))
    .bind(new.industry_id)
    .bind(&new.code)
    .bind(&new.material)
    .bind(new.height_cm)
    .bind(new.width_cm)
    .bind(new.thickness_cm)
    .bind(new.quantity_slabs)
    .bind(new.industry_price_cents)
    .bind(new.price_unit.as_str())
    .bind(new.total_area_m2)
    .fetch_one(pool)
    .await?;

    row.into_model()
}

/// Plain read; never blocks on the row lock.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Batch>> {
    let row = sqlx::query_as::<_, BatchRow>(&format!(
        "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(BatchRow::into_model).transpose()
}

/// Locking read: acquires an exclusive row lock on the batch for the
/// remainder of the transaction. This is the sole serialization point
/// for concurrent reservation attempts on the same batch; blocking here
/// while another transaction holds the lock is the intended
/// backpressure, not an error.
pub async fn find_by_id_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> AppResult<Option<Batch>> {
    let row = sqlx::query_as::<_, BatchRow>(&format!(
        "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    row.map(BatchRow::into_model).transpose()
}

/// Status update inside a caller-owned transaction.
pub async fn update_status_tx(
    conn: &mut PgConnection,
    id: Uuid,
    status: BatchStatus,
) -> AppResult<()> {
    let result = sqlx::query("UPDATE batches SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch".to_string()));
    }
    Ok(())
}

/// Replace both slab counters at once, keeping the range invariant.
pub async fn update_slab_counts(
    conn: &mut PgConnection,
    id: Uuid,
    quantity_slabs: i32,
    available_slabs: i32,
) -> AppResult<()> {
    if available_slabs < 0 || available_slabs > quantity_slabs {
        return Err(AppError::Conflict {
            resource: "batch".to_string(),
            message: "Available slabs must be between 0 and the total quantity".to_string(),
            message_pt: "Chapas disponíveis devem estar entre 0 e a quantidade total".to_string(),
        });
    }

    let result = sqlx::query(
        r#"
        UPDATE batches
        SET quantity_slabs = $1, available_slabs = $2, updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(quantity_slabs)
    .bind(available_slabs)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch".to_string()));
    }
    Ok(())
}

/// Whether a batch code is already taken within an industry.
pub async fn exists_by_code(pool: &PgPool, industry_id: Uuid, code: &str) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM batches WHERE industry_id = $1 AND code = $2)",
    )
    .bind(industry_id)
    .bind(code)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Full-field update; the service has already merged and recomputed.
pub async fn update(pool: &PgPool, id: Uuid, changes: &BatchUpdate) -> AppResult<Batch> {
    let row = sqlx::query_as::<_, BatchRow>(&format!(
        r#"
        UPDATE batches
        SET material = $1, height_cm = $2, width_cm = $3, thickness_cm = $4,
            quantity_slabs = $5, available_slabs = $6, industry_price_cents = $7,
            price_unit = $8, total_area_m2 = $9, updated_at = NOW()
        WHERE id = $10
        RETURNING {BATCH_COLUMNS}
        "#
    ))
    .bind(&changes.material)
    .bind(changes.height_cm)
    .bind(changes.width_cm)
    .bind(changes.thickness_cm)
    .bind(changes.quantity_slabs)
    .bind(changes.available_slabs)
    .bind(changes.industry_price_cents)
    .bind(changes.price_unit.as_str())
    .bind(changes.total_area_m2)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

    row.into_model()
}

/// List batches with optional filters, newest first, paginated.
pub async fn list(
    pool: &PgPool,
    filters: &BatchFilters,
    page: &Pagination,
) -> AppResult<PaginatedResponse<Batch>> {
    let total_items = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM batches
        WHERE ($1::uuid IS NULL OR industry_id = $1)
          AND ($2::varchar IS NULL OR status = $2)
          AND ($3::varchar IS NULL OR material ILIKE '%' || $3 || '%')
        "#,
    )
    .bind(filters.industry_id)
    .bind(filters.status.map(|s| s.as_str()))
    .bind(filters.material.as_deref())
    .fetch_one(pool)
    .await? as u64;

    let current = page.page.max(1);
    let per_page = page.per_page.clamp(1, 100);
    let offset = (current - 1) as i64 * per_page as i64;

    let rows = sqlx::query_as::<_, BatchRow>(&format!(
        r#"
        SELECT {BATCH_COLUMNS}
        FROM batches
        WHERE ($1::uuid IS NULL OR industry_id = $1)
          AND ($2::varchar IS NULL OR status = $2)
          AND ($3::varchar IS NULL OR material ILIKE '%' || $3 || '%')
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(filters.industry_id)
    .bind(filters.status.map(|s| s.as_str()))
    .bind(filters.material.as_deref())
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let data = rows
        .into_iter()
        .map(BatchRow::into_model)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(PaginatedResponse {
        data,
        pagination: PaginationMeta {
            page: current,
            per_page,
            total_items,
            total_pages: total_items.div_ceil(per_page as u64) as u32,
        },
    })
}

/// Soft-archive a batch. Callers must have checked for active
/// reservations first.
pub async fn archive(pool: &PgPool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE batches SET is_active = FALSE, status = 'inactive', updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch".to_string()));
    }
    Ok(())
}
