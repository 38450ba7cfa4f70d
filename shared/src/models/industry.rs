//! Industry (tenant) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The tenant that owns batches and receives net proceeds from sales
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Industry {
    pub id: Uuid,
    pub name: String,
    /// Short code used in batch codes (e.g., "VIX")
    pub code: String,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
