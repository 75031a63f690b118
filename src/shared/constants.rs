/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page number a listing search may request
pub const MAX_PAGE: i64 = 1000;

// =============================================================================
// CACHE TAGS
// =============================================================================

/// Tag carried by every cached listing page; invalidated on listing writes
pub const LISTINGS_CACHE_TAG: &str = "listings";
