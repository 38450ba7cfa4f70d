//! HTTP handlers for industry endpoints

use axum::{extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::industry::IndustryService;
use crate::AppState;
use shared::models::Industry;

/// Get the caller's own industry profile
pub async fn get_my_industry(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Industry>> {
    let industry_id = current_user.0.industry_id.ok_or(AppError::Unauthorized {
        message: "Caller is not linked to an industry".to_string(),
        message_pt: "O usuário não está vinculado a uma indústria".to_string(),
    })?;

    let service = IndustryService::new(state.db);
    let industry = service.get(industry_id).await?;
    Ok(Json(industry))
}
