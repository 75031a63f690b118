use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::listings::{
    dtos as listings_dtos, handlers as listings_handlers, models as listings_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Listings (public)
        listings_handlers::search_listings,
    ),
    components(
        schemas(
            Meta,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_handlers::CategoryListDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_handlers::CategoryListDto>,
            // Listings
            listings_models::DatePosted,
            listings_dtos::CategoryRefDto,
            listings_dtos::ListingCategoryDto,
            listings_dtos::ListingOwnerDto,
            listings_dtos::ListingImageDto,
            listings_dtos::ReviewSummaryDto,
            listings_dtos::ListingView,
            listings_dtos::ListingsPageDto,
            ApiResponse<listings_dtos::ListingsPageDto>,
        )
    ),
    tags(
        (name = "categories", description = "Category hierarchy (public)"),
        (name = "listings", description = "Listing search by category path (public)"),
    ),
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "API documentation for the marketplace listings service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
