use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::features::listings::dtos::{ListingQueryOutcome, ListingView, ListingsPageDto};
use crate::features::listings::models::ListingFilter;
use crate::features::listings::services::ListingRepository;
use crate::shared::types::PageRequest;

/// Runs listing predicates against the repository.
///
/// Never fails: a repository error is logged and turned into an empty,
/// degraded outcome.
pub struct ListingQueryService {
    repository: Arc<dyn ListingRepository>,
    default_image_url: String,
    query_ceiling: Duration,
}

impl ListingQueryService {
    pub fn new(
        repository: Arc<dyn ListingRepository>,
        default_image_url: impl Into<String>,
        query_ceiling: Duration,
    ) -> Self {
        Self {
            repository,
            default_image_url: default_image_url.into(),
            query_ceiling,
        }
    }

    pub async fn execute(&self, filter: &ListingFilter, page: PageRequest) -> ListingQueryOutcome {
        if filter.matches_nothing() {
            return ListingQueryOutcome::ok(ListingsPageDto::empty());
        }

        let started = Instant::now();
        let result = self
            .repository
            .fetch_page(filter, page.offset(), page.limit())
            .await;
        let elapsed = started.elapsed();

        // Advisory only; the query is never cancelled
        if elapsed > self.query_ceiling {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                ceiling_ms = self.query_ceiling.as_millis() as u64,
                "Listing query exceeded its time ceiling"
            );
        }

        match result {
            Ok(listing_page) => {
                let listings = listing_page
                    .records
                    .into_iter()
                    .map(|record| ListingView::from_record(record, &self.default_image_url))
                    .collect();
                ListingQueryOutcome::ok(ListingsPageDto {
                    listings,
                    total_count: listing_page.total_count,
                })
            }
            Err(e) => {
                tracing::error!(
                    page = page.page,
                    page_size = page.page_size,
                    "Listing query failed, returning empty result: {}",
                    e
                );
                ListingQueryOutcome::degraded(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryScope;
    use crate::features::listings::models::ListingFacets;
    use crate::shared::test_helpers::{InMemoryListingRepository, ListingBuilder};
    use chrono::{Duration as ChronoDuration, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn service(repository: Arc<InMemoryListingRepository>) -> ListingQueryService {
        ListingQueryService::new(repository, "/images/default.jpg", Duration::from_secs(60))
    }

    fn filter_for(category_id: Uuid) -> ListingFilter {
        ListingFilter::build(
            CategoryScope::single(category_id),
            &ListingFacets::default(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_second_page_returns_matches_eleven_to_twenty() {
        let category_id = Uuid::new_v4();
        let now = Utc::now();
        let listings: Vec<_> = (0..25)
            .map(|i| {
                ListingBuilder::new(category_id)
                    .title(&format!("Listing {}", i))
                    .created_at(now - ChronoDuration::hours(i))
                    .build()
            })
            .collect();
        let expected: Vec<Uuid> = listings[10..20].iter().map(|l| l.id).collect();
        let repository = Arc::new(InMemoryListingRepository::new(listings));

        let outcome = service(repository)
            .execute(&filter_for(category_id), PageRequest::new(2, 10))
            .await;

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.page.total_count, 25);
        let ids: Vec<Uuid> = outcome.page.listings.iter().map(|l| l.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_listing_without_images_gets_default_image() {
        let category_id = Uuid::new_v4();
        let bare = ListingBuilder::new(category_id).build();
        let repository = Arc::new(InMemoryListingRepository::new(vec![bare]));

        let outcome = service(repository)
            .execute(&filter_for(category_id), PageRequest::new(1, 10))
            .await;

        let images = &outcome.page.listings[0].images;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "/images/default.jpg");
    }

    #[tokio::test]
    async fn test_prices_are_formatted() {
        let category_id = Uuid::new_v4();
        let now = Utc::now();
        let priced = ListingBuilder::new(category_id)
            .price(Decimal::new(42, 0))
            .created_at(now)
            .build();
        let unpriced = ListingBuilder::new(category_id)
            .created_at(now - ChronoDuration::minutes(1))
            .build();
        let repository = Arc::new(InMemoryListingRepository::new(vec![priced, unpriced]));

        let outcome = service(repository)
            .execute(&filter_for(category_id), PageRequest::new(1, 10))
            .await;

        let prices: Vec<&str> = outcome.page.listings.iter().map(|l| l.price.as_str()).collect();
        assert_eq!(prices, vec!["42.00", "0.00"]);
    }

    #[tokio::test]
    async fn test_repository_failure_degrades_to_empty_page() {
        let category_id = Uuid::new_v4();
        let repository = Arc::new(InMemoryListingRepository::new(vec![
            ListingBuilder::new(category_id).build(),
        ]));
        repository.fail_with("connection reset");

        let outcome = service(repository)
            .execute(&filter_for(category_id), PageRequest::new(1, 10))
            .await;

        assert!(outcome.is_degraded());
        assert!(outcome.page.listings.is_empty());
        assert_eq!(outcome.page.total_count, 0);
        assert!(outcome.failure.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_scope_skips_repository() {
        let repository = Arc::new(InMemoryListingRepository::new(vec![]));
        let filter = ListingFilter::build(CategoryScope::empty(), &ListingFacets::default(), Utc::now());

        let outcome = service(Arc::clone(&repository))
            .execute(&filter, PageRequest::new(1, 10))
            .await;

        assert_eq!(outcome.page.total_count, 0);
        assert_eq!(repository.calls(), 0);
    }
}
