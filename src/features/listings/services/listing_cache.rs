use async_trait::async_trait;
use futures::future::BoxFuture;
use rust_decimal::Decimal;

use crate::core::error::AppError;
use crate::features::listings::dtos::ListingsPageDto;
use crate::features::listings::models::{DatePosted, ListingSearch};
use crate::shared::cache::TtlCache;
use crate::shared::constants::LISTINGS_CACHE_TAG;

/// Every input of a listing search, normalized for use as a cache key.
///
/// Category names and location are lowercased because both are matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingCacheKey {
    main_category: String,
    sub_category: Option<String>,
    sub_sub_category: Option<String>,
    page: i64,
    page_size: i64,
    location: Option<String>,
    date_posted: Option<DatePosted>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
}

impl From<&ListingSearch> for ListingCacheKey {
    fn from(search: &ListingSearch) -> Self {
        Self {
            main_category: search.main_category.to_lowercase(),
            sub_category: search.sub_category.as_deref().map(str::to_lowercase),
            sub_sub_category: search.sub_sub_category.as_deref().map(str::to_lowercase),
            page: search.page.page,
            page_size: search.page.page_size,
            location: search.facets.location.as_deref().map(str::to_lowercase),
            date_posted: search.facets.date_posted,
            min_price: search.facets.min_price,
            max_price: search.facets.max_price,
        }
    }
}

/// Why a computed result was not stored
#[derive(Debug)]
pub enum Uncacheable {
    /// The search itself failed (e.g. unknown category)
    Rejected(AppError),
    /// The query ran but degraded to an empty page; carries the diagnostic
    Degraded(String),
}

/// Memoizes listing pages by search key
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Returns the cached page for `key` or awaits `compute` and stores its
    /// result. Concurrent callers with the same key share one computation.
    async fn get_or_compute(
        &self,
        key: ListingCacheKey,
        compute: BoxFuture<'_, Result<ListingsPageDto, Uncacheable>>,
    ) -> Result<ListingsPageDto, Uncacheable>;

    /// Drops all listing pages; returns how many were dropped
    async fn invalidate(&self) -> usize;

    async fn clear(&self);
}

#[async_trait]
impl ListingCache for TtlCache<ListingCacheKey, ListingsPageDto> {
    async fn get_or_compute(
        &self,
        key: ListingCacheKey,
        compute: BoxFuture<'_, Result<ListingsPageDto, Uncacheable>>,
    ) -> Result<ListingsPageDto, Uncacheable> {
        self.get_or_try_insert_with(key, &[LISTINGS_CACHE_TAG], || compute)
            .await
    }

    async fn invalidate(&self) -> usize {
        self.invalidate_tag(LISTINGS_CACHE_TAG).await
    }

    async fn clear(&self) {
        TtlCache::clear(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::listings::models::ListingFacets;
    use crate::shared::types::PageRequest;
    use std::time::Duration;

    fn search(main: &str, sub: Option<&str>) -> ListingSearch {
        ListingSearch {
            main_category: main.to_string(),
            sub_category: sub.map(str::to_string),
            sub_sub_category: None,
            page: PageRequest::new(1, 10),
            facets: ListingFacets::default(),
        }
    }

    #[test]
    fn test_key_ignores_category_case() {
        let a = ListingCacheKey::from(&search("Electronics", Some("Mobile Phones")));
        let b = ListingCacheKey::from(&search("ELECTRONICS", Some("mobile phones")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_ignores_location_case() {
        let mut upper = search("Jobs", None);
        upper.facets.location = Some("Nairobi".to_string());
        let mut lower = search("jobs", None);
        lower.facets.location = Some("nairobi".to_string());

        assert_eq!(ListingCacheKey::from(&upper), ListingCacheKey::from(&lower));
    }

    #[test]
    fn test_key_distinguishes_pages_and_facets() {
        let base = search("Jobs", None);
        let mut next_page = base.clone();
        next_page.page = PageRequest::new(2, 10);
        let mut located = base.clone();
        located.facets.location = Some("Accra".to_string());

        let key = ListingCacheKey::from(&base);
        assert_ne!(key, ListingCacheKey::from(&next_page));
        assert_ne!(key, ListingCacheKey::from(&located));
    }

    #[tokio::test]
    async fn test_rejected_results_are_not_stored() {
        let cache: TtlCache<ListingCacheKey, ListingsPageDto> = TtlCache::new(Duration::from_secs(60));
        let key = ListingCacheKey::from(&search("Jobs", None));

        let result = cache
            .get_or_compute(
                key.clone(),
                Box::pin(async { Err(Uncacheable::Degraded("db down".to_string())) }),
            )
            .await;

        assert!(matches!(result, Err(Uncacheable::Degraded(_))));
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_drops_listing_pages() {
        let cache: TtlCache<ListingCacheKey, ListingsPageDto> = TtlCache::new(Duration::from_secs(60));
        let key = ListingCacheKey::from(&search("Jobs", None));

        cache
            .get_or_compute(key.clone(), Box::pin(async { Ok(ListingsPageDto::empty()) }))
            .await
            .unwrap();
        assert!(cache.get(&key).await.is_some());

        assert_eq!(ListingCache::invalidate(&cache).await, 1);
        assert!(cache.get(&key).await.is_none());
    }
}
