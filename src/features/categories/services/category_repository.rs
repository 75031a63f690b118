use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;

/// Read access to the category table
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All active categories ordered by display order then name
    async fn list_active(&self) -> Result<Vec<Category>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Every active category whose own, parent's or grandparent's name
    /// equals `name` case-insensitively.
    ///
    /// One query covers all three levels of the hierarchy below a category
    /// named `name`.
    async fn find_lineage(&self, name: &str) -> Result<Vec<Category>>;
}

/// Postgres-backed category repository
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_active(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, is_active, created_at, updated_at
            FROM categories
            WHERE is_active = TRUE
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, is_active, created_at, updated_at
            FROM categories
            WHERE slug = $1 AND is_active = TRUE
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_lineage(&self, name: &str) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.parent_id, c.name, c.slug, c.description, c.display_order,
                   c.is_active, c.created_at, c.updated_at
            FROM categories c
            LEFT JOIN categories p ON p.id = c.parent_id
            LEFT JOIN categories g ON g.id = p.parent_id
            WHERE c.is_active = TRUE
              AND (LOWER(c.name) = LOWER($1)
                   OR LOWER(p.name) = LOWER($1)
                   OR LOWER(g.name) = LOWER($1))
            ORDER BY c.display_order, c.name
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load category lineage for '{}': {:?}", name, e);
            AppError::Database(e)
        })
    }
}
