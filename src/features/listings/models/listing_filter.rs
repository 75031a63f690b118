use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{DatePosted, ListingRecord};
use crate::features::categories::models::CategoryScope;

/// Optional narrowing applied on top of the category scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListingFacets {
    pub location: Option<String>,
    pub date_posted: Option<DatePosted>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Declarative predicate over listings.
///
/// Every condition must hold. An empty `category_ids` scope matches no
/// listing at all, and a price bound excludes listings without a price.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub category_ids: CategoryScope,
    /// Compared case-insensitively for equality
    pub location: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub posted_after: Option<DateTime<Utc>>,
    /// Inclusive
    pub min_price: Option<Decimal>,
    /// Inclusive
    pub max_price: Option<Decimal>,
}

impl ListingFilter {
    pub fn build(category_ids: CategoryScope, facets: &ListingFacets, now: DateTime<Utc>) -> Self {
        Self {
            category_ids,
            location: facets.location.clone(),
            posted_after: facets.date_posted.map(|d| d.cutoff(now)),
            min_price: facets.min_price,
            max_price: facets.max_price,
        }
    }

    /// True when no listing can satisfy the predicate
    pub fn matches_nothing(&self) -> bool {
        if self.category_ids.is_empty() {
            return true;
        }
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    /// Evaluates the predicate against one listing
    pub fn matches(&self, listing: &ListingRecord) -> bool {
        if !self.category_ids.contains(&listing.category.id) {
            return false;
        }

        if let Some(location) = &self.location {
            let same = listing
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase() == location.to_lowercase());
            if !same {
                return false;
            }
        }

        if let Some(after) = self.posted_after {
            if listing.created_at < after {
                return false;
            }
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = listing.price else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }

        true
    }
}
