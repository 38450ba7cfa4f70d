//! Industry (tenant) queries
//!
//! Industry rows are created during registration; this service reads
//! them back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Industry;

/// Industry query service
#[derive(Clone)]
pub struct IndustryService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct IndustryRow {
    id: Uuid,
    name: String,
    code: String,
    cnpj: Option<String>,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl IndustryRow {
    fn into_model(self) -> Industry {
        Industry {
            id: self.id,
            name: self.name,
            code: self.code,
            cnpj: self.cnpj,
            phone: self.phone,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

impl IndustryService {
    /// Create a new IndustryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get an industry by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Industry> {
        let row = sqlx::query_as::<_, IndustryRow>(
            "SELECT id, name, code, cnpj, phone, is_active, created_at FROM industries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Industry".to_string()))?;

        Ok(row.into_model())
    }
}
