mod listing_cache;
mod listing_query_service;
mod listing_repository;
mod listing_service;

pub use listing_cache::{ListingCache, ListingCacheKey, Uncacheable};
pub use listing_query_service::ListingQueryService;
pub use listing_repository::{ListingRepository, PgListingRepository};
pub use listing_service::ListingService;
