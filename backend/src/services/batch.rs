//! Batch management service for inventory units

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::stores;
use crate::stores::batch::{BatchFilters, BatchUpdate, NewBatch};
use shared::models::{calculate_total_area, Batch};
use shared::types::{amount_from_float, amount_to_float, PaginatedResponse, Pagination, PriceUnit};
use shared::validation;

/// Batch service for managing slab inventory
#[derive(Clone)]
pub struct BatchService {
    db: PgPool,
}

/// Input for creating a batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub code: String,
    pub material: String,
    pub height_cm: f64,
    pub width_cm: f64,
    pub thickness_cm: f64,
    pub quantity_slabs: i32,
    /// Asking price per area unit (float view)
    pub industry_price: f64,
    pub price_unit: Option<PriceUnit>,
}

/// Input for updating a batch; omitted fields keep their value
#[derive(Debug, Deserialize)]
pub struct UpdateBatchInput {
    pub material: Option<String>,
    pub height_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub thickness_cm: Option<f64>,
    pub quantity_slabs: Option<i32>,
    pub available_slabs: Option<i32>,
    pub industry_price: Option<f64>,
    pub price_unit: Option<PriceUnit>,
}

/// Price view of a batch in a requested unit
#[derive(Debug, Serialize)]
pub struct BatchPriceView {
    pub batch_id: Uuid,
    pub unit: PriceUnit,
    pub price_per_unit: f64,
    pub total_area_m2: f64,
    pub total_price: f64,
}

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new batch with a full complement of available slabs.
    pub async fn create(&self, industry_id: Uuid, input: CreateBatchInput) -> AppResult<Batch> {
        if let Err(msg) = validation::validate_batch_code(&input.code) {
            return Err(validation_error("code", msg));
        }
        if input.material.trim().is_empty() {
            return Err(validation_error("material", "Material cannot be empty"));
        }
        if let Err(msg) =
            validation::validate_dimensions(input.height_cm, input.width_cm, input.thickness_cm)
        {
            return Err(validation_error("dimensions", msg));
        }
        if let Err(msg) = validation::validate_quantity(input.quantity_slabs) {
            return Err(validation_error("quantity_slabs", msg));
        }

        let industry_price_cents = amount_from_float(input.industry_price);
        if let Err(msg) = validation::validate_price_cents(industry_price_cents) {
            return Err(validation_error("industry_price", msg));
        }

        if stores::batch::exists_by_code(&self.db, industry_id, &input.code).await? {
            return Err(AppError::DuplicateEntry("batch code".to_string()));
        }

        let total_area_m2 =
            calculate_total_area(input.height_cm, input.width_cm, input.quantity_slabs);

        let batch = stores::batch::insert(
            &self.db,
            &NewBatch {
                industry_id,
                code: input.code,
                material: input.material,
                height_cm: input.height_cm,
                width_cm: input.width_cm,
                thickness_cm: input.thickness_cm,
                quantity_slabs: input.quantity_slabs,
                industry_price_cents,
                price_unit: input.price_unit.unwrap_or_default(),
                total_area_m2,
            },
        )
        .await?;

        tracing::info!(batch_id = %batch.id, code = %batch.code, "Batch created");

        Ok(batch)
    }

    /// Get a batch by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Batch> {
        stores::batch::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))
    }

    /// List batches with optional filters, paginated
    pub async fn list(
        &self,
        filters: BatchFilters,
        page: Pagination,
    ) -> AppResult<PaginatedResponse<Batch>> {
        stores::batch::list(&self.db, &filters, &page).await
    }

    /// Update a batch, recomputing the total area when dimensions or
    /// quantity change. Status changes go through the reservation
    /// lifecycle, never through here.
    pub async fn update(&self, id: Uuid, input: UpdateBatchInput) -> AppResult<Batch> {
        let existing = self.get(id).await?;

        let material = input.material.unwrap_or(existing.material);
        let height_cm = input.height_cm.unwrap_or(existing.height_cm);
        let width_cm = input.width_cm.unwrap_or(existing.width_cm);
        let thickness_cm = input.thickness_cm.unwrap_or(existing.thickness_cm);
        let quantity_slabs = input.quantity_slabs.unwrap_or(existing.quantity_slabs);
        let available_slabs = input.available_slabs.unwrap_or_else(|| {
            // Shrinking the batch caps the free count at the new total
            existing.available_slabs.min(quantity_slabs)
        });
        let industry_price_cents = input
            .industry_price
            .map(amount_from_float)
            .unwrap_or(existing.industry_price_cents);
        let price_unit = input.price_unit.unwrap_or(existing.price_unit);

        if material.trim().is_empty() {
            return Err(validation_error("material", "Material cannot be empty"));
        }
        if let Err(msg) = validation::validate_dimensions(height_cm, width_cm, thickness_cm) {
            return Err(validation_error("dimensions", msg));
        }
        if let Err(msg) = validation::validate_quantity(quantity_slabs) {
            return Err(validation_error("quantity_slabs", msg));
        }
        if let Err(msg) = validation::validate_price_cents(industry_price_cents) {
            return Err(validation_error("industry_price", msg));
        }
        if available_slabs < 0 || available_slabs > quantity_slabs {
            return Err(validation_error(
                "available_slabs",
                "Available slabs must be between 0 and the total quantity",
            ));
        }

        let total_area_m2 = calculate_total_area(height_cm, width_cm, quantity_slabs);

        stores::batch::update(
            &self.db,
            id,
            &BatchUpdate {
                material,
                height_cm,
                width_cm,
                thickness_cm,
                quantity_slabs,
                available_slabs,
                industry_price_cents,
                price_unit,
                total_area_m2,
            },
        )
        .await
    }

    /// Soft-archive a batch. Refused while an active reservation still
    /// references it.
    pub async fn archive(&self, id: Uuid) -> AppResult<()> {
        let has_active_reservation = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE batch_id = $1 AND status = 'active')",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if has_active_reservation {
            return Err(AppError::Conflict {
                resource: "batch".to_string(),
                message: "Batch has an active reservation and cannot be archived".to_string(),
                message_pt: "O lote tem uma reserva ativa e não pode ser arquivado".to_string(),
            });
        }

        stores::batch::archive(&self.db, id).await?;

        tracing::info!(batch_id = %id, "Batch archived");

        Ok(())
    }

    /// Price view of a batch in the requested unit
    pub async fn get_price(&self, id: Uuid, unit: PriceUnit) -> AppResult<BatchPriceView> {
        let batch = self.get(id).await?;
        Ok(BatchPriceView {
            batch_id: batch.id,
            unit,
            price_per_unit: batch.price_in_unit(unit),
            total_area_m2: batch.total_area(),
            total_price: amount_to_float(batch.total_price_cents()),
        })
    }
}

fn validation_error(field: &str, message: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
        message_pt: format!("Dados inválidos: {}", field),
    }
}
