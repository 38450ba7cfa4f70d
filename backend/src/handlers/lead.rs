//! HTTP handlers for lead endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::lead::{CreateLeadInput, LeadService};
use crate::AppState;
use shared::models::Lead;

/// Capture a new lead
pub async fn create_lead(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLeadInput>,
) -> AppResult<Json<Lead>> {
    let service = LeadService::new(state.db);
    let lead = service.create(current_user.0.user_id, input).await?;
    Ok(Json(lead))
}

/// Get a lead by ID
pub async fn get_lead(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(lead_id): Path<Uuid>,
) -> AppResult<Json<Lead>> {
    let service = LeadService::new(state.db);
    let lead = service.get(lead_id).await?;
    Ok(Json(lead))
}

/// List leads captured by the caller
pub async fn list_leads(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Lead>>> {
    let service = LeadService::new(state.db);
    let leads = service.list(current_user.0.user_id).await?;
    Ok(Json(leads))
}
