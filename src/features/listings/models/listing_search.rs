use super::ListingFacets;
use crate::shared::types::PageRequest;

/// Everything a listing search is keyed on
#[derive(Debug, Clone)]
pub struct ListingSearch {
    pub main_category: String,
    pub sub_category: Option<String>,
    pub sub_sub_category: Option<String>,
    pub page: PageRequest,
    pub facets: ListingFacets,
}
