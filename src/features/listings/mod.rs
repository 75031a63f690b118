//! Listing search by category path.
//!
//! A search resolves the category path to a set of category ids, narrows it
//! with optional facets and reads one page of listings in a single snapshot.
//! Results are memoized per search and dropped when listing data changes.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::ListingService;
pub use workers::ListingInvalidationListener;
