use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::extractor::empty_string_as_none;
use crate::features::listings::models::{
    CategoryRef, DatePosted, ListingCategory, ListingFacets, ListingImage, ListingOwner,
    ListingRecord, ListingSearch, ReviewSummary,
};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE, MAX_PAGE_SIZE};
use crate::shared::types::PageRequest;

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Parses an optional decimal, treating an empty value as absent
fn empty_string_as_none_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_string_as_none(deserializer)? {
        Some(raw) => raw
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{}': {}", raw, e))),
        None => Ok(None),
    }
}

// ============================================================================
// Request
// ============================================================================

/// Query parameters for searching listings
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SearchListingsQuery {
    /// Name of the main category (case-insensitive)
    #[param(example = "Electronics")]
    #[validate(length(min = 1, message = "main_category must not be empty"))]
    pub main_category: String,

    /// Name of a direct child of the main category
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(example = "Mobile Phones")]
    pub sub_category: Option<String>,

    /// Third-level category name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sub_sub_category: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1, maximum = 1000)]
    #[validate(range(min = 1, max = MAX_PAGE, message = "page must be between 1 and 1000"))]
    pub page: i64,

    /// Number of listings per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    #[validate(range(min = 1, max = MAX_PAGE_SIZE, message = "page_size must be between 1 and 100"))]
    pub page_size: i64,

    /// Exact location, compared case-insensitively
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,

    /// `24h`, `7d` or `30d`; other values are ignored
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(example = "7d")]
    pub date_posted: Option<String>,

    /// Inclusive lower price bound
    #[serde(default, deserialize_with = "empty_string_as_none_decimal")]
    #[param(value_type = Option<String>, example = "100.00")]
    pub min_price: Option<Decimal>,

    /// Inclusive upper price bound
    #[serde(default, deserialize_with = "empty_string_as_none_decimal")]
    #[param(value_type = Option<String>, example = "500.00")]
    pub max_price: Option<Decimal>,
}

impl SearchListingsQuery {
    pub fn into_search(self) -> ListingSearch {
        let date_posted = self.date_posted.as_deref().and_then(DatePosted::parse);
        if date_posted.is_none() {
            if let Some(raw) = &self.date_posted {
                tracing::debug!(date_posted = %raw, "Ignoring unrecognized date_posted value");
            }
        }

        ListingSearch {
            main_category: self.main_category,
            sub_category: self.sub_category,
            sub_sub_category: self.sub_sub_category,
            page: PageRequest::new(self.page, self.page_size),
            facets: ListingFacets {
                location: self.location,
                date_posted,
                min_price: self.min_price,
                max_price: self.max_price,
            },
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryRefDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<CategoryRef> for CategoryRefDto {
    fn from(c: CategoryRef) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Category of a listing with its parent
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingCategoryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<CategoryRefDto>,
}

impl From<ListingCategory> for ListingCategoryDto {
    fn from(c: ListingCategory) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            parent: c.parent.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingOwnerDto {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ListingOwner> for ListingOwnerDto {
    fn from(o: ListingOwner) -> Self {
        Self {
            id: o.id,
            username: o.username,
            display_name: o.display_name,
            avatar_url: o.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingImageDto {
    pub id: Uuid,
    pub url: String,
    /// True for the default image substituted when a listing has none
    pub is_placeholder: bool,
}

impl From<ListingImage> for ListingImageDto {
    fn from(image: ListingImage) -> Self {
        Self {
            is_placeholder: image.is_placeholder(),
            id: image.id,
            url: image.url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewSummaryDto {
    pub id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewSummary> for ReviewSummaryDto {
    fn from(r: ReviewSummary) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            comment: r.comment,
            reviewer_name: r.reviewer_name,
            created_at: r.created_at,
        }
    }
}

/// A listing as presented to callers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Always two decimals; `"0.00"` when the listing has no price
    #[schema(example = "149.99")]
    pub price: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub category: ListingCategoryDto,
    pub owner: ListingOwnerDto,
    /// Never empty
    pub images: Vec<ListingImageDto>,
    pub reviews: Vec<ReviewSummaryDto>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
}

impl ListingView {
    /// Build the view, substituting the default image when the listing has none
    pub fn from_record(record: ListingRecord, default_image_url: &str) -> Self {
        let images = if record.images.is_empty() {
            vec![ListingImage::placeholder(record.id, default_image_url, record.created_at)]
        } else {
            record.images
        };

        let review_count = record.reviews.len();
        let average_rating = (review_count > 0).then(|| {
            let sum: i64 = record.reviews.iter().map(|r| i64::from(r.rating)).sum();
            sum as f64 / review_count as f64
        });

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: format_price(record.price),
            location: record.location,
            created_at: record.created_at,
            category: record.category.into(),
            owner: record.owner.into(),
            images: images.into_iter().map(Into::into).collect(),
            reviews: record.reviews.into_iter().map(Into::into).collect(),
            review_count,
            average_rating,
        }
    }
}

/// Render a price with exactly two decimals, halves rounded away from zero
pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(p) => format!(
            "{:.2}",
            p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => "0.00".to_string(),
    }
}

/// A page of listings plus the number of listings matching the search
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ListingsPageDto {
    pub listings: Vec<ListingView>,
    pub total_count: i64,
}

impl ListingsPageDto {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Result of running a listing query.
///
/// A failed query still yields an (empty) page; `failure` then carries the
/// diagnostic so callers can tell "no matches" from "could not look".
#[derive(Debug, Clone)]
pub struct ListingQueryOutcome {
    pub page: ListingsPageDto,
    pub failure: Option<String>,
}

impl ListingQueryOutcome {
    pub fn ok(page: ListingsPageDto) -> Self {
        Self { page, failure: None }
    }

    pub fn degraded(failure: impl Into<String>) -> Self {
        Self {
            page: ListingsPageDto::empty(),
            failure: Some(failure.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}
