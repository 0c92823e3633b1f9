//! Genres repository for database operations

use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::genre::Genre,
    query::{ListQuery, QuerySchema},
};

pub static GENRE_SCHEMA: QuerySchema = QuerySchema {
    base: &["g.is_deleted = FALSE"],
    filterable: &[],
    searchable: &["g.name"],
    sortable: &[("name", "g.name"), ("createdAt", "g.created_at")],
    selectable: &["id", "name", "createdAt", "updatedAt"],
    default_sort: "g.created_at",
};

/// Translate list parameters for the genre surface
pub fn list_query(params: &IndexMap<String, String>) -> AppResult<ListQuery> {
    ListQuery::build(&GENRE_SCHEMA, params)
}

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check if a live genre already carries this name (exact match)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM genres WHERE name = $1 AND is_deleted = FALSE AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM genres WHERE name = $1 AND is_deleted = FALSE)",
            )
            .bind(name)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Check if a live genre exists (referential check for books)
    pub async fn exists_live(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM genres WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new genre
    pub async fn create(&self, name: &str) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(genre)
    }

    /// List genres over the effective filter, with the matching total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Genre>, i64)> {
        query.fetch_page::<Genre>(&self.pool, "genres g", "g.*").await
    }

    /// Rename a genre
    pub async fn update(&self, id: Uuid, name: &str) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            UPDATE genres SET name = $2, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

        Ok(genre)
    }

    /// Soft delete a genre; a second call sees no matching row
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            UPDATE genres SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

        Ok(genre)
    }
}
