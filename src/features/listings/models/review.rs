use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Review as shown under a listing
#[derive(Debug, Clone, FromRow)]
pub struct ReviewSummary {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub created_at: DateTime<Utc>,
}
