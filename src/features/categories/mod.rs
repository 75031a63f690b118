//! Category hierarchy: browsing endpoints and path resolution.
//!
//! Categories form a tree three levels deep (main category, subcategory,
//! sub-subcategory). Listing search resolves a name path through
//! [`CategoryService::resolve`] before filtering listings.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
