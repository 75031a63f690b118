//! Fixtures and in-memory repository doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, SubSubCategoryMatch};
use crate::features::categories::services::CategoryRepository;
use crate::features::categories::CategoryService;
use crate::features::listings::models::{
    ListingCategory, ListingFilter, ListingImage, ListingOwner, ListingPage, ListingRecord,
    ReviewSummary,
};
use crate::features::listings::dtos::ListingsPageDto;
use crate::features::listings::services::{
    ListingCacheKey, ListingQueryService, ListingRepository,
};
use crate::features::listings::ListingService;
use crate::shared::cache::TtlCache;

// =============================================================================
// CATEGORIES
// =============================================================================

pub fn category(name: &str, parent_id: Option<Uuid>) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::new_v4(),
        parent_id,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: None,
        display_order: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn category_with_description(name: &str, parent_id: Option<Uuid>, description: &str) -> Category {
    Category {
        description: Some(description.to_string()),
        ..category(name, parent_id)
    }
}

/// Category repository over a fixed list
pub struct InMemoryCategoryRepository {
    categories: Vec<Category>,
}

impl InMemoryCategoryRepository {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    fn by_id(&self, id: Option<Uuid>) -> Option<&Category> {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
    }

    fn sorted_active(&self, keep: impl Fn(&Category) -> bool) -> Vec<Category> {
        let mut found: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| c.is_active && keep(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.display_order, &a.name).cmp(&(b.display_order, &b.name)));
        found
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_active(&self) -> Result<Vec<Category>> {
        Ok(self.sorted_active(|_| true))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.is_active && c.slug == slug)
            .cloned())
    }

    async fn find_lineage(&self, name: &str) -> Result<Vec<Category>> {
        Ok(self.sorted_active(|c| {
            let parent = self.by_id(c.parent_id);
            let grandparent = parent.and_then(|p| self.by_id(p.parent_id));
            c.name_matches(name)
                || parent.is_some_and(|p| p.name_matches(name))
                || grandparent.is_some_and(|g| g.name_matches(name))
        }))
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

/// Builds a listing record with generated text and no images or reviews
pub struct ListingBuilder {
    record: ListingRecord,
}

impl ListingBuilder {
    pub fn new(category_id: Uuid) -> Self {
        let username: String = Username().fake();
        Self {
            record: ListingRecord {
                id: Uuid::new_v4(),
                title: Sentence(2..5).fake(),
                description: Paragraph(1..3).fake(),
                price: None,
                location: None,
                created_at: Utc::now(),
                category: ListingCategory {
                    id: category_id,
                    name: "Category".to_string(),
                    slug: "category".to_string(),
                    parent: None,
                },
                owner: ListingOwner {
                    id: Uuid::new_v4(),
                    username,
                    display_name: None,
                    avatar_url: None,
                },
                images: Vec::new(),
                reviews: Vec::new(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.record.price = Some(price);
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.record.location = Some(location.to_string());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.record.created_at = created_at;
        self
    }

    pub fn image(mut self, url: &str) -> Self {
        self.record.images.push(ListingImage {
            id: Uuid::new_v4(),
            listing_id: self.record.id,
            url: url.to_string(),
            created_at: self.record.created_at,
        });
        self
    }

    pub fn build(self) -> ListingRecord {
        self.record
    }
}

pub fn review(listing_id: Uuid, rating: i16) -> ReviewSummary {
    ReviewSummary {
        id: Uuid::new_v4(),
        listing_id,
        rating,
        comment: Some(Sentence(3..8).fake()),
        reviewer_name: Username().fake(),
        created_at: Utc::now(),
    }
}

/// Listing repository over a fixed list, counting calls and able to fail
pub struct InMemoryListingRepository {
    listings: Vec<ListingRecord>,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl InMemoryListingRepository {
    pub fn new(listings: Vec<ListingRecord>) -> Self {
        Self {
            listings,
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Number of `fetch_page` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every following call fail with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn fetch_page(&self, filter: &ListingFilter, offset: i64, limit: i64) -> Result<ListingPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AppError::Database(sqlx::Error::Protocol(message)));
        }

        let mut matching: Vec<&ListingRecord> =
            self.listings.iter().filter(|l| filter.matches(l)).collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(ListingPage {
            total_count: matching.len() as i64,
            records: matching
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }
}

/// Fully wired listing service over in-memory repositories
pub fn listing_service(
    categories: InMemoryCategoryRepository,
    listings: Arc<InMemoryListingRepository>,
) -> ListingService {
    let category_service = Arc::new(CategoryService::new(
        Arc::new(categories),
        SubSubCategoryMatch::ChildName,
    ));
    let queries = Arc::new(ListingQueryService::new(
        listings,
        "/images/default.jpg",
        Duration::from_secs(60),
    ));
    let cache: Arc<TtlCache<ListingCacheKey, ListingsPageDto>> =
        Arc::new(TtlCache::new(Duration::from_secs(300)));
    ListingService::new(category_service, queries, cache)
}
