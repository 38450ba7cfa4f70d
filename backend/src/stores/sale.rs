//! Sale ledger store
//!
//! Append-only: inserts and reads exist, updates and deletes do not.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Sale;
use shared::types::DateRange;

const SALE_COLUMNS: &str = "id, batch_id, reservation_id, sold_by, industry_id, lead_id, \
     customer_name, customer_contact, sale_price_cents, broker_commission_cents, \
     net_industry_value_cents, invoice_url, notes, sale_date, created_at";

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    batch_id: Uuid,
    reservation_id: Uuid,
    sold_by: Uuid,
    industry_id: Uuid,
    lead_id: Option<Uuid>,
    customer_name: String,
    customer_contact: String,
    sale_price_cents: i64,
    broker_commission_cents: i64,
    net_industry_value_cents: i64,
    invoice_url: Option<String>,
    notes: Option<String>,
    sale_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_model(self) -> Sale {
        Sale {
            id: self.id,
            batch_id: self.batch_id,
            reservation_id: self.reservation_id,
            sold_by: self.sold_by,
            industry_id: self.industry_id,
            lead_id: self.lead_id,
            customer_name: self.customer_name,
            customer_contact: self.customer_contact,
            sale_price_cents: self.sale_price_cents,
            broker_commission_cents: self.broker_commission_cents,
            net_industry_value_cents: self.net_industry_value_cents,
            invoice_url: self.invoice_url,
            notes: self.notes,
            sale_date: self.sale_date,
            created_at: self.created_at,
        }
    }
}

/// Fields for the one-time sale insert
#[derive(Debug)]
pub struct NewSale {
    pub batch_id: Uuid,
    pub reservation_id: Uuid,
    pub sold_by: Uuid,
    pub industry_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_contact: String,
    pub sale_price_cents: i64,
    pub broker_commission_cents: i64,
    pub net_industry_value_cents: i64,
    pub invoice_url: Option<String>,
    pub notes: Option<String>,
    pub sale_date: NaiveDate,
}

/// Filters for listing sales
#[derive(Debug, Default)]
pub struct SaleFilters {
    pub sold_by: Option<Uuid>,
    pub industry_id: Option<Uuid>,
    pub date_range: Option<DateRange>,
}

/// Insert the sale record inside the confirming transaction. The unique
/// constraint on reservation_id makes a second confirmation of the same
/// reservation impossible at the schema level too.
pub async fn insert_tx(conn: &mut PgConnection, new: &NewSale) -> AppResult<Sale> {
    let row = sqlx::query_as::<_, SaleRow>(&format!(
        r#"
        INSERT INTO sales (
            batch_id, reservation_id, sold_by, industry_id, lead_id,
            customer_name, customer_contact, sale_price_cents, broker_commission_cents,
            net_industry_value_cents, invoice_url, notes, sale_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {SALE_COLUMNS}
        "#
    ))
    .bind(new.batch_id)
    .bind(new.reservation_id)
    .bind(new.sold_by)
    .bind(new.industry_id)
    .bind(new.lead_id)
    .bind(&new.customer_name)
    .bind(&new.customer_contact)
    .bind(new.sale_price_cents)
    .bind(new.broker_commission_cents)
    .bind(new.net_industry_value_cents)
    .bind(&new.invoice_url)
    .bind(&new.notes)
    .bind(new.sale_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into_model())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Sale> {
    let row = sqlx::query_as::<_, SaleRow>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

    Ok(row.into_model())
}

pub async fn find_by_reservation(pool: &PgPool, reservation_id: Uuid) -> AppResult<Option<Sale>> {
    let row = sqlx::query_as::<_, SaleRow>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales WHERE reservation_id = $1"
    ))
    .bind(reservation_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(SaleRow::into_model))
}

pub async fn list(pool: &PgPool, filters: &SaleFilters) -> AppResult<Vec<Sale>> {
    let rows = sqlx::query_as::<_, SaleRow>(&format!(
        r#"
        SELECT {SALE_COLUMNS}
        FROM sales
        WHERE ($1::uuid IS NULL OR sold_by = $1)
          AND ($2::uuid IS NULL OR industry_id = $2)
          AND ($3::date IS NULL OR sale_date >= $3)
          AND ($4::date IS NULL OR sale_date <= $4)
        ORDER BY sale_date DESC, created_at DESC
        "#
    ))
    .bind(filters.sold_by)
    .bind(filters.industry_id)
    .bind(filters.date_range.as_ref().map(|r| r.start))
    .bind(filters.date_range.as_ref().map(|r| r.end))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SaleRow::into_model).collect())
}
