//! Batch model and availability state machine
//!
//! A batch is a physical lot of identical stone slabs tracked as one
//! inventory unit. Availability is a property of the batch itself; the
//! reservation lifecycle mutates it only through the transitions
//! enumerated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{amount_to_float, convert_price, PriceUnit};

/// A physical lot of identical stone slabs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub industry_id: Uuid,
    /// Unique batch code within the owning industry (e.g., "BR-GRA-0042")
    pub code: String,
    pub material: String,
    pub height_cm: f64,
    pub width_cm: f64,
    pub thickness_cm: f64,
    pub quantity_slabs: i32,
    pub available_slabs: i32,
    /// Industry's asking price per area unit, in centavos
    pub industry_price_cents: i64,
    pub price_unit: PriceUnit,
    pub total_area_m2: f64,
    pub status: BatchStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Availability status of a batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Available,
    Reserved,
    Sold,
    Inactive,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Available => "available",
            BatchStatus::Reserved => "reserved",
            BatchStatus::Sold => "sold",
            BatchStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(BatchStatus::Available),
            "reserved" => Some(BatchStatus::Reserved),
            "sold" => Some(BatchStatus::Sold),
            "inactive" => Some(BatchStatus::Inactive),
            _ => None,
        }
    }

    /// Legal status transitions. Anything not enumerated here is rejected
    /// by the lifecycle service.
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Available, BatchStatus::Reserved)
                | (BatchStatus::Available, BatchStatus::Inactive)
                | (BatchStatus::Reserved, BatchStatus::Available)
                | (BatchStatus::Reserved, BatchStatus::Sold)
                | (BatchStatus::Inactive, BatchStatus::Available)
        )
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Batch {
    /// A batch can be reserved iff it is available, active, and has at
    /// least one free slab.
    pub fn is_available(&self) -> bool {
        self.status == BatchStatus::Available && self.is_active && self.available_slabs > 0
    }

    /// Whether `n` slabs can be taken from this batch.
    pub fn has_available_slabs(&self, n: i32) -> bool {
        self.is_active && self.available_slabs >= n
    }

    /// Industry price converted into the requested unit (float view).
    pub fn price_in_unit(&self, unit: PriceUnit) -> f64 {
        convert_price(
            amount_to_float(self.industry_price_cents),
            self.price_unit,
            unit,
        )
    }

    /// Total slab area in m²: height × width × quantity, cm² -> m².
    pub fn total_area(&self) -> f64 {
        calculate_total_area(self.height_cm, self.width_cm, self.quantity_slabs)
    }

    /// Asking price for the whole batch, in centavos.
    pub fn total_price_cents(&self) -> i64 {
        crate::types::amount_from_float(self.price_in_unit(PriceUnit::M2) * self.total_area())
    }
}

/// Total slab area in m² for the given dimensions and slab count.
pub fn calculate_total_area(height_cm: f64, width_cm: f64, quantity_slabs: i32) -> f64 {
    height_cm * width_cm * quantity_slabs as f64 / 10_000.0
}
