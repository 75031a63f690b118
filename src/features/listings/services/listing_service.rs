use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;

use crate::core::error::Result;
use crate::features::categories::CategoryService;
use crate::features::listings::dtos::{ListingQueryOutcome, ListingsPageDto};
use crate::features::listings::models::{ListingFilter, ListingSearch};
use crate::features::listings::services::{
    ListingCache, ListingCacheKey, ListingQueryService, Uncacheable,
};

/// Category-path listing search: resolve, filter, query, memoize
pub struct ListingService {
    categories: Arc<CategoryService>,
    queries: Arc<ListingQueryService>,
    cache: Arc<dyn ListingCache>,
}

impl ListingService {
    pub fn new(
        categories: Arc<CategoryService>,
        queries: Arc<ListingQueryService>,
        cache: Arc<dyn ListingCache>,
    ) -> Self {
        Self {
            categories,
            queries,
            cache,
        }
    }

    /// Search listings under a category path.
    ///
    /// Returns `NotFound` when the main category does not exist. A query
    /// failure is reported through the outcome's diagnostic and is not cached.
    pub async fn search(&self, search: &ListingSearch) -> Result<ListingQueryOutcome> {
        let key = ListingCacheKey::from(search);
        let computed = AtomicBool::new(false);

        let compute: BoxFuture<'_, std::result::Result<ListingsPageDto, Uncacheable>> =
            Box::pin(async {
                computed.store(true, Ordering::Relaxed);
                tracing::debug!(main_category = %search.main_category, "Listing cache miss");

                let scope = self
                    .categories
                    .resolve(
                        &search.main_category,
                        search.sub_category.as_deref(),
                        search.sub_sub_category.as_deref(),
                    )
                    .await
                    .map_err(Uncacheable::Rejected)?;

                let filter = ListingFilter::build(scope, &search.facets, Utc::now());
                let outcome = self.queries.execute(&filter, search.page).await;

                match outcome.failure {
                    Some(failure) => Err(Uncacheable::Degraded(failure)),
                    None => Ok(outcome.page),
                }
            });

        let result = self.cache.get_or_compute(key, compute).await;
        if !computed.load(Ordering::Relaxed) {
            tracing::debug!(main_category = %search.main_category, "Listing cache hit");
        }

        match result {
            Ok(page) => Ok(ListingQueryOutcome::ok(page)),
            Err(Uncacheable::Degraded(failure)) => Ok(ListingQueryOutcome::degraded(failure)),
            Err(Uncacheable::Rejected(e)) => Err(e),
        }
    }

    /// Drop every cached listing page after a listing-related write
    pub async fn invalidate(&self) -> usize {
        let dropped = self.cache.invalidate().await;
        tracing::debug!(dropped, "Invalidated cached listing pages");
        dropped
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
