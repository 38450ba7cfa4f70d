//! HTTP handlers for reservation lifecycle endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::reservation::{
    ConfirmSaleInput, CreateReservationInput, ExpirationSweep, ReservationService,
};
use crate::stores;
use crate::stores::reservation::ActiveReservation;
use crate::AppState;
use shared::models::{Reservation, Sale};

fn reservation_service(state: &AppState) -> ReservationService {
    ReservationService::new(state.db.clone(), state.config.sweeper.default_ttl_days)
}

/// Reserve a batch for a lead or walk-in customer
pub async fn create_reservation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateReservationInput>,
) -> AppResult<Json<Reservation>> {
    if !current_user.0.is_broker() && !current_user.0.is_admin() {
        return Err(AppError::Unauthorized {
            message: "Only brokers can reserve batches".to_string(),
            message_pt: "Apenas corretores podem reservar lotes".to_string(),
        });
    }
    let service = reservation_service(&state);
    let reservation = service.create(current_user.0.user_id, input).await?;
    Ok(Json(reservation))
}

/// Get a reservation by ID
pub async fn get_reservation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<Reservation>> {
    let reservation = stores::reservation::find_by_id(&state.db, reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;
    Ok(Json(reservation))
}

/// List the caller's active reservations with batch context
pub async fn list_active_reservations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ActiveReservation>>> {
    let service = reservation_service(&state);
    let reservations = service.list_active(current_user.0.user_id).await?;
    Ok(Json(reservations))
}

/// Cancel an active reservation, releasing the batch
pub async fn cancel_reservation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = reservation_service(&state);
    service.cancel(reservation_id).await?;
    Ok(Json(()))
}

/// Confirm an active reservation into a sale
pub async fn confirm_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(reservation_id): Path<Uuid>,
    Json(input): Json<ConfirmSaleInput>,
) -> AppResult<Json<Sale>> {
    let service = reservation_service(&state);
    let sale = service
        .confirm_sale(reservation_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(sale))
}

/// Run an expiration sweep on demand. The background task runs the same
/// sweep on an interval; this endpoint exists for operational use.
pub async fn expire_reservations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ExpirationSweep>> {
    if !current_user.0.is_admin() {
        return Err(AppError::Unauthorized {
            message: "Only admins can trigger an expiration sweep".to_string(),
            message_pt: "Apenas administradores podem executar a varredura de expiração".to_string(),
        });
    }
    let service = reservation_service(&state);
    let sweep = service.expire_reservations().await?;
    Ok(Json(sweep))
}
