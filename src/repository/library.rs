//! User library repository for database operations

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::library::{AddToLibrary, LibraryEntry, LibraryEntryRow, Shelf, UpdateLibraryEntry},
    query::{BindValue, Column, ColumnKind, ListQuery, QuerySchema},
};

pub static LIBRARY_SCHEMA: QuerySchema = QuerySchema {
    base: &[],
    filterable: &[Column {
        key: "shelf",
        column: "ul.shelf",
        kind: ColumnKind::Text,
    }],
    searchable: &["b.title", "b.author"],
    sortable: &[
        ("createdAt", "ul.created_at"),
        ("progress", "ul.progress"),
        ("title", "b.title"),
    ],
    selectable: &[
        "id",
        "user",
        "book",
        "shelf",
        "progress",
        "createdAt",
        "updatedAt",
    ],
    default_sort: "ul.created_at",
};

const LIBRARY_FROM: &str = "user_library ul \
     JOIN books b ON ul.book_id = b.id \
     JOIN genres g ON b.genre_id = g.id";

const LIBRARY_SELECT: &str = "ul.id, ul.user_id, ul.shelf, ul.progress, ul.created_at, ul.updated_at, \
     b.id AS book_id, b.title AS book_title, b.author AS book_author, \
     b.genre_id AS genre_id, g.name AS genre_name, \
     b.description AS book_description, b.cover_image_url AS book_cover_image_url, \
     b.rating_avg AS book_rating_avg, b.rating_count AS book_rating_count, \
     b.is_deleted AS book_is_deleted, b.created_at AS book_created_at, \
     b.updated_at AS book_updated_at";

/// Translate list parameters for one user's library
pub fn my_library_query(
    user_id: Uuid,
    params: &IndexMap<String, String>,
) -> AppResult<ListQuery> {
    let mut query = ListQuery::new(&LIBRARY_SCHEMA);
    query.push_eq("ul.user_id", BindValue::Uuid(user_id));
    query.apply(params)?;
    Ok(query)
}

#[derive(Clone)]
pub struct LibraryRepository {
    pool: Pool<Postgres>,
}

impl LibraryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check if the user already shelved this book
    pub async fn entry_exists(&self, user_id: Uuid, book_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_library WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Add a book to a user's library
    pub async fn add(&self, user_id: Uuid, entry: &AddToLibrary) -> AppResult<LibraryEntry> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO user_library (user_id, book_id, shelf, progress)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(entry.book)
        .bind(entry.shelf.unwrap_or_default().as_str())
        .bind(entry.progress.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Get a library entry by ID with its book embedded
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<LibraryEntry> {
        let sql = format!(
            "SELECT {} FROM {} WHERE ul.id = $1",
            LIBRARY_SELECT, LIBRARY_FROM
        );
        let row = sqlx::query_as::<_, LibraryEntryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Library entry not found".to_string()))?;

        Ok(row.into())
    }

    /// List library entries over the effective filter, with the matching total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<LibraryEntry>, i64)> {
        let (rows, total) = query
            .fetch_page::<LibraryEntryRow>(&self.pool, LIBRARY_FROM, LIBRARY_SELECT)
            .await?;
        Ok((rows.into_iter().map(LibraryEntry::from).collect(), total))
    }

    /// Update an entry the user owns; foreign rows match nothing
    pub async fn update_entry(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &UpdateLibraryEntry,
    ) -> AppResult<LibraryEntry> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE user_library
            SET shelf = COALESCE($3, shelf),
                progress = COALESCE($4, progress),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.shelf.map(|shelf| shelf.as_str()))
        .bind(changes.progress)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(AppError::NotFound("Library entry not found".to_string())),
        }
    }

    /// Count completed-shelf entries a user touched inside a window
    pub async fn count_completed_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM user_library
            WHERE user_id = $1 AND shelf = $2 AND updated_at BETWEEN $3 AND $4
            "#,
        )
        .bind(user_id)
        .bind(Shelf::Completed.as_str())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
