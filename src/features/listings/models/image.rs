use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a listing image
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ListingImage {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl ListingImage {
    /// Placeholder shown when a listing has no images. Never persisted; its
    /// id is the nil UUID.
    pub fn placeholder(listing_id: Uuid, url: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            listing_id,
            url: url.to_string(),
            created_at,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil()
    }
}
