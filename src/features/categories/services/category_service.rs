use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, CategoryTreeDto};
use crate::features::categories::models::{CategoryScope, CategoryTree, SubSubCategoryMatch};
use crate::features::categories::services::{CategoryRepository, CategoryResolver};

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    resolver: CategoryResolver,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>, sub_sub_match: SubSubCategoryMatch) -> Self {
        Self {
            repository,
            resolver: CategoryResolver::new(sub_sub_match),
        }
    }

    /// List all active categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list_active().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all active categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.repository.list_active().await?;
        let tree = CategoryTree::from_flat(categories);
        Ok(CategoryTreeDto::from_tree(&tree))
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        self.repository
            .find_by_slug(slug)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Resolve a category path into the ids of the categories it covers.
    ///
    /// Loads the three levels below `main_category` in a single repository
    /// call and walks them in memory.
    pub async fn resolve(
        &self,
        main_category: &str,
        sub_category: Option<&str>,
        sub_sub_category: Option<&str>,
    ) -> Result<CategoryScope> {
        let lineage = self.repository.find_lineage(main_category).await?;
        let tree = CategoryTree::from_flat(lineage);

        let scope = self
            .resolver
            .resolve(&tree, main_category, sub_category, sub_sub_category)?;

        tracing::debug!(
            main_category,
            sub_category,
            sub_sub_category,
            loaded = tree.len(),
            resolved = scope.len(),
            "Resolved category path"
        );

        Ok(scope)
    }
}
