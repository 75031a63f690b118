use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::ValidatedQuery;
use crate::features::listings::dtos::{ListingsPageDto, SearchListingsQuery};
use crate::features::listings::services::ListingService;
use crate::shared::types::{ApiResponse, Meta};

/// Search listings by category path
///
/// Resolves the category path, applies the optional facets and returns one
/// page of listings, newest first. Results are cached for a short window.
#[utoipa::path(
    get,
    path = "/api/listings",
    params(SearchListingsQuery),
    responses(
        (status = 200, description = "Page of listings; `message` is set when the lookup degraded", body = ApiResponse<ListingsPageDto>),
        (status = 400, description = "Invalid pagination or malformed query"),
        (status = 404, description = "Main category not found")
    ),
    tag = "listings"
)]
pub async fn search_listings(
    State(service): State<Arc<ListingService>>,
    ValidatedQuery(query): ValidatedQuery<SearchListingsQuery>,
) -> Result<Json<ApiResponse<ListingsPageDto>>> {
    let search = query.into_search();
    let outcome = service.search(&search).await?;

    let message = outcome
        .failure
        .map(|_| "Listings are temporarily unavailable".to_string());
    let total = outcome.page.total_count;

    Ok(Json(ApiResponse::success(
        Some(outcome.page),
        message,
        Some(Meta { total }),
    )))
}
