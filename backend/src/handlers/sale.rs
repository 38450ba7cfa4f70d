//! HTTP handlers for sale query endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sale::SaleService;
use crate::AppState;
use shared::models::Sale;
use shared::types::DateRange;

/// Query parameters for listing sales
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Get a sale by ID
pub async fn get_sale(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<Sale>> {
    let service = SaleService::new(state.db);
    let sale = service.get(sale_id).await?;
    Ok(Json(sale))
}

/// Get the sale produced by a reservation; null while unconfirmed
pub async fn get_reservation_sale(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<Option<Sale>>> {
    let service = SaleService::new(state.db);
    let sale = service.get_by_reservation(reservation_id).await?;
    Ok(Json(sale))
}

/// List sales visible to the caller. Industry users see sales of their
/// batches; everyone else sees the sales they closed.
pub async fn list_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListSalesQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let date_range = query
        .from
        .zip(query.to)
        .map(|(start, end)| DateRange { start, end });

    let service = SaleService::new(state.db);
    let sales = match current_user.0.industry_id {
        Some(industry_id) => service.list_for_industry(industry_id, date_range).await?,
        None => {
            service
                .list_for_actor(current_user.0.user_id, date_range)
                .await?
        }
    };
    Ok(Json(sales))
}
