//! Reviews repository for database operations

use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, Review, ReviewRow},
    query::{BindValue, Column, ColumnKind, ListQuery, QuerySchema},
};

/// Public review surface: only approved, live reviews are listable
pub static REVIEW_SCHEMA: QuerySchema = QuerySchema {
    base: &["r.is_deleted = FALSE", "r.status = 'approved'"],
    filterable: &[Column {
        key: "rating",
        column: "r.rating",
        kind: ColumnKind::Int,
    }],
    searchable: &["r.comment"],
    sortable: &[("rating", "r.rating"), ("createdAt", "r.created_at")],
    selectable: &[
        "id",
        "user",
        "book",
        "rating",
        "comment",
        "status",
        "createdAt",
        "updatedAt",
    ],
    default_sort: "r.created_at",
};

const REVIEW_FROM: &str = "reviews r JOIN users u ON r.user_id = u.id";

const REVIEW_SELECT: &str = "r.id, r.user_id, u.name AS user_name, u.email AS user_email, \
     r.book_id, r.rating, r.comment, r.status, r.is_deleted, r.created_at, r.updated_at";

/// Translate list parameters for one book's approved reviews
pub fn approved_for_book_query(
    book_id: Uuid,
    params: &IndexMap<String, String>,
) -> AppResult<ListQuery> {
    let mut query = ListQuery::new(&REVIEW_SCHEMA);
    query.push_eq("r.book_id", BindValue::Uuid(book_id));
    query.apply(params)?;
    Ok(query)
}

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a review in the pending state
    pub async fn create(&self, user_id: Uuid, review: &CreateReview) -> AppResult<Review> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (user_id, book_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(review.book)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Get review by ID with its reviewer embedded, excluding deleted reviews
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Review> {
        let sql = format!(
            "SELECT {} FROM {} WHERE r.id = $1 AND r.is_deleted = FALSE",
            REVIEW_SELECT, REVIEW_FROM
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found or deleted".to_string()))?;

        Ok(row.into())
    }

    /// List approved reviews over the effective filter, with the matching total
    pub async fn list_approved(&self, query: &ListQuery) -> AppResult<(Vec<Review>, i64)> {
        let (rows, total) = query
            .fetch_page::<ReviewRow>(&self.pool, REVIEW_FROM, REVIEW_SELECT)
            .await?;
        Ok((rows.into_iter().map(Review::from).collect(), total))
    }

    /// Move a review to the approved state; approving twice is a no-op
    pub async fn approve(&self, id: Uuid) -> AppResult<Review> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE reviews SET status = 'approved', updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(AppError::NotFound("Review not found or deleted".to_string())),
        }
    }
}
