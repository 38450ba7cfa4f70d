//! Lead model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prospective customer captured from a shared sales link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    /// Phone or email, whichever the lead supplied
    pub contact: String,
    pub email: Option<String>,
    /// The broker who captured the lead
    pub created_by: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
