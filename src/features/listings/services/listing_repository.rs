use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::database::begin_snapshot;
use crate::core::error::{AppError, Result};
use crate::features::listings::models::{
    CategoryRef, ListingCategory, ListingFilter, ListingImage, ListingOwner, ListingPage,
    ListingRecord, ReviewSummary,
};

/// Read access to listings and their related rows
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// One page of listings matching `filter`, newest first, together with
    /// the total number of matches. Both are read from the same snapshot.
    async fn fetch_page(&self, filter: &ListingFilter, offset: i64, limit: i64) -> Result<ListingPage>;
}

/// Postgres-backed listing repository
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    id: Uuid,
    title: String,
    description: String,
    price: Option<Decimal>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    category_id: Uuid,
    category_name: String,
    category_slug: String,
    parent_category_id: Option<Uuid>,
    parent_category_name: Option<String>,
    parent_category_slug: Option<String>,
    owner_id: Uuid,
    owner_username: String,
    owner_display_name: Option<String>,
    owner_avatar_url: Option<String>,
}

impl ListingRow {
    fn into_record(self, images: Vec<ListingImage>, reviews: Vec<ReviewSummary>) -> ListingRecord {
        let parent = match (
            self.parent_category_id,
            self.parent_category_name,
            self.parent_category_slug,
        ) {
            (Some(id), Some(name), Some(slug)) => Some(CategoryRef { id, name, slug }),
            _ => None,
        };

        ListingRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            created_at: self.created_at,
            category: ListingCategory {
                id: self.category_id,
                name: self.category_name,
                slug: self.category_slug,
                parent,
            },
            owner: ListingOwner {
                id: self.owner_id,
                username: self.owner_username,
                display_name: self.owner_display_name,
                avatar_url: self.owner_avatar_url,
            },
            images,
            reviews,
        }
    }
}

/// Appends the WHERE clause for `filter` (listings aliased as `l`)
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    builder
        .push(" WHERE l.category_id = ANY(")
        .push_bind(filter.category_ids.to_vec())
        .push(")");

    if let Some(location) = &filter.location {
        builder
            .push(" AND LOWER(l.location) = LOWER(")
            .push_bind(location.clone())
            .push(")");
    }

    if let Some(posted_after) = filter.posted_after {
        builder.push(" AND l.created_at >= ").push_bind(posted_after);
    }

    // NULL prices fail both comparisons, which excludes them once any bound is set
    if let Some(min_price) = filter.min_price {
        builder.push(" AND l.price >= ").push_bind(min_price);
    }

    if let Some(max_price) = filter.max_price {
        builder.push(" AND l.price <= ").push_bind(max_price);
    }
}

fn count_query(filter: &ListingFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM listings l");
    push_predicate(&mut builder, filter);
    builder
}

/// Newest-first page of listings joined with category, parent category and owner
fn page_query(filter: &ListingFilter, offset: i64, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT l.id, l.title, l.description, l.price, l.location, l.created_at,
               c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
               p.id AS parent_category_id, p.name AS parent_category_name,
               p.slug AS parent_category_slug,
               u.id AS owner_id, u.username AS owner_username,
               u.display_name AS owner_display_name, u.avatar_url AS owner_avatar_url
        FROM listings l
        JOIN categories c ON c.id = l.category_id
        LEFT JOIN categories p ON p.id = c.parent_id
        JOIN users u ON u.id = l.user_id
        "#,
    );
    push_predicate(&mut builder, filter);
    builder
        .push(" ORDER BY l.created_at DESC, l.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder
}

fn group_by_listing<T>(rows: Vec<T>, listing_id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(listing_id(&row)).or_default().push(row);
    }
    grouped
}

fn log_db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    async fn fetch_page(&self, filter: &ListingFilter, offset: i64, limit: i64) -> Result<ListingPage> {
        let mut tx = begin_snapshot(&self.pool)
            .await
            .map_err(log_db_error("Failed to open listing snapshot"))?;

        let mut counting = count_query(filter);
        let total_count: i64 = counting
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(log_db_error("Failed to count listings"))?;

        if total_count == 0 || offset >= total_count {
            tx.commit()
                .await
                .map_err(log_db_error("Failed to close listing snapshot"))?;
            return Ok(ListingPage {
                records: Vec::new(),
                total_count,
            });
        }

        let mut paging = page_query(filter, offset, limit);
        let rows: Vec<ListingRow> = paging
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(log_db_error("Failed to fetch listings"))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let images = sqlx::query_as::<_, ListingImage>(
            r#"
            SELECT id, listing_id, url, created_at
            FROM images
            WHERE listing_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(log_db_error("Failed to fetch listing images"))?;

        let reviews = sqlx::query_as::<_, ReviewSummary>(
            r#"
            SELECT r.id, r.listing_id, r.rating, r.comment,
                   COALESCE(u.display_name, u.username) AS reviewer_name, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.listing_id = ANY($1)
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(log_db_error("Failed to fetch listing reviews"))?;

        tx.commit()
            .await
            .map_err(log_db_error("Failed to close listing snapshot"))?;

        let mut images = group_by_listing(images, |i| i.listing_id);
        let mut reviews = group_by_listing(reviews, |r| r.listing_id);

        let records = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_record(
                    images.remove(&id).unwrap_or_default(),
                    reviews.remove(&id).unwrap_or_default(),
                )
            })
            .collect();

        Ok(ListingPage {
            records,
            total_count,
        })
    }
}
