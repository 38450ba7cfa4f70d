//! Read-only queries over the sale ledger
//!
//! Sales are written exclusively by the reservation lifecycle service;
//! this service only reads them back.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::stores;
use crate::stores::sale::SaleFilters;
use shared::models::Sale;
use shared::types::DateRange;

/// Sale query service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a sale by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Sale> {
        stores::sale::find_by_id(&self.db, id).await
    }

    /// Get the sale produced by a reservation, if any
    pub async fn get_by_reservation(&self, reservation_id: Uuid) -> AppResult<Option<Sale>> {
        stores::sale::find_by_reservation(&self.db, reservation_id).await
    }

    /// Sales closed by an actor, optionally within a date range
    pub async fn list_for_actor(
        &self,
        actor_id: Uuid,
        date_range: Option<DateRange>,
    ) -> AppResult<Vec<Sale>> {
        stores::sale::list(
            &self.db,
            &SaleFilters {
                sold_by: Some(actor_id),
                industry_id: None,
                date_range,
            },
        )
        .await
    }

    /// Sales of an industry's batches, optionally within a date range
    pub async fn list_for_industry(
        &self,
        industry_id: Uuid,
        date_range: Option<DateRange>,
    ) -> AppResult<Vec<Sale>> {
        stores::sale::list(
            &self.db,
            &SaleFilters {
                sold_by: None,
                industry_id: Some(industry_id),
                date_range,
            },
        )
        .await
    }
}
