use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{ListingImage, ReviewSummary};

/// A listing joined with everything a listing card displays
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub category: ListingCategory,
    pub owner: ListingOwner,
    /// Oldest first
    pub images: Vec<ListingImage>,
    /// Newest first
    pub reviews: Vec<ReviewSummary>,
}

/// The category a listing is filed under, with its parent
#[derive(Debug, Clone)]
pub struct ListingCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent: Option<CategoryRef>,
}

#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct ListingOwner {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One page of matching listings and the total number of matches
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub records: Vec<ListingRecord>,
    pub total_count: i64,
}
