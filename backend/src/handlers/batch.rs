//! HTTP handlers for batch inventory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::batch::{BatchPriceView, BatchService, CreateBatchInput, UpdateBatchInput};
use crate::stores::batch::BatchFilters;
use crate::AppState;
use shared::models::{Batch, BatchStatus};
use shared::types::{PaginatedResponse, Pagination, PriceUnit};

/// Query parameters for listing batches
#[derive(Debug, Deserialize)]
pub struct ListBatchesQuery {
    pub industry_id: Option<Uuid>,
    pub status: Option<BatchStatus>,
    pub material: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Query parameters for the price view
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub unit: Option<PriceUnit>,
}

/// Register a new batch for the caller's industry
pub async fn create_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<Json<Batch>> {
    let industry_id = require_industry(&current_user)?;
    let service = BatchService::new(state.db);
    let batch = service.create(industry_id, input).await?;
    Ok(Json(batch))
}

/// Get a batch by ID
pub async fn get_batch(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Batch>> {
    let service = BatchService::new(state.db);
    let batch = service.get(batch_id).await?;
    Ok(Json(batch))
}

/// List batches with optional filters. Industry users only see their own.
pub async fn list_batches(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListBatchesQuery>,
) -> AppResult<Json<PaginatedResponse<Batch>>> {
    let industry_id = match current_user.0.industry_id {
        Some(id) => Some(id),
        None => query.industry_id,
    };

    let defaults = Pagination::default();
    let page = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let service = BatchService::new(state.db);
    let batches = service
        .list(
            BatchFilters {
                industry_id,
                status: query.status,
                material: query.material,
            },
            page,
        )
        .await?;
    Ok(Json(batches))
}

/// Update a batch owned by the caller's industry
pub async fn update_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateBatchInput>,
) -> AppResult<Json<Batch>> {
    let industry_id = require_industry(&current_user)?;
    let service = BatchService::new(state.db);
    ensure_owner(&service, batch_id, industry_id).await?;
    let batch = service.update(batch_id, input).await?;
    Ok(Json(batch))
}

/// Soft-archive a batch owned by the caller's industry
pub async fn archive_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let industry_id = require_industry(&current_user)?;
    let service = BatchService::new(state.db);
    ensure_owner(&service, batch_id, industry_id).await?;
    service.archive(batch_id).await?;
    Ok(Json(()))
}

/// Price view of a batch in the requested unit
pub async fn get_batch_price(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
    Query(query): Query<PriceQuery>,
) -> AppResult<Json<BatchPriceView>> {
    let service = BatchService::new(state.db);
    let view = service
        .get_price(batch_id, query.unit.unwrap_or_default())
        .await?;
    Ok(Json(view))
}

fn require_industry(current_user: &CurrentUser) -> AppResult<Uuid> {
    if !current_user.0.is_industry() {
        return Err(AppError::Unauthorized {
            message: "Only industry accounts can manage batches".to_string(),
            message_pt: "Apenas contas de indústria podem gerenciar lotes".to_string(),
        });
    }
    current_user.0.industry_id.ok_or(AppError::Unauthorized {
        message: "Industry account has no linked industry".to_string(),
        message_pt: "A conta de indústria não tem indústria vinculada".to_string(),
    })
}

async fn ensure_owner(service: &BatchService, batch_id: Uuid, industry_id: Uuid) -> AppResult<()> {
    let batch = service.get(batch_id).await?;
    if batch.industry_id != industry_id {
        return Err(AppError::Unauthorized {
            message: "Batch belongs to another industry".to_string(),
            message_pt: "O lote pertence a outra indústria".to_string(),
        });
    }
    Ok(())
}
