//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Square feet per square meter, the fixed factor used for all
/// price-unit conversions.
pub const SQFT_PER_SQM: f64 = 10.763_910_42;

/// Area unit a batch price is quoted in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    #[default]
    M2,
    Ft2,
}

impl PriceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceUnit::M2 => "m2",
            PriceUnit::Ft2 => "ft2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "m2" => Some(PriceUnit::M2),
            "ft2" => Some(PriceUnit::Ft2),
            _ => None,
        }
    }
}

/// Convert a per-area price between units.
///
/// A square foot is smaller than a square meter, so a per-ft² price is
/// lower than the equivalent per-m² price: divide going M2 -> FT2,
/// multiply going FT2 -> M2.
pub fn convert_price(price: f64, from: PriceUnit, to: PriceUnit) -> f64 {
    match (from, to) {
        (PriceUnit::M2, PriceUnit::Ft2) => price / SQFT_PER_SQM,
        (PriceUnit::Ft2, PriceUnit::M2) => price * SQFT_PER_SQM,
        _ => price,
    }
}

/// Monetary amount in minor units (centavos).
///
/// Ledger math is done on integers to avoid floating-point drift; the
/// float view exists only for API convenience.
pub fn amount_to_float(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Float view back to minor units, rounding half-up.
///
/// Rounds at a tenth-of-a-centavo guard digit first, so decimal-intent
/// inputs like 1.005 (whose nearest f64 sits just below the half
/// boundary) still land on the expected centavo.
pub fn amount_from_float(amount: f64) -> i64 {
    (((amount * 1000.0).round()) / 10.0).round() as i64
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
