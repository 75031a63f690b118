mod date_posted;
mod image;
mod listing;
mod listing_filter;
mod listing_search;
mod review;

pub use date_posted::DatePosted;
pub use image::ListingImage;
pub use listing::{CategoryRef, ListingCategory, ListingOwner, ListingPage, ListingRecord};
pub use listing_filter::{ListingFacets, ListingFilter};
pub use listing_search::ListingSearch;
pub use review::ReviewSummary;
