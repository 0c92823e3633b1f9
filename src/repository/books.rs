//! Books repository for database operations

use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookRow, CreateBook, UpdateBook},
    query::{Column, ColumnKind, ListQuery, QuerySchema},
};

pub static BOOK_SCHEMA: QuerySchema = QuerySchema {
    base: &["b.is_deleted = FALSE"],
    filterable: &[
        Column {
            key: "genre",
            column: "b.genre_id",
            kind: ColumnKind::Uuid,
        },
        Column {
            key: "author",
            column: "b.author",
            kind: ColumnKind::Text,
        },
    ],
    searchable: &["b.title", "b.author", "b.description"],
    sortable: &[
        ("title", "b.title"),
        ("author", "b.author"),
        ("rating", "b.rating_avg"),
        ("createdAt", "b.created_at"),
    ],
    selectable: &[
        "id",
        "title",
        "author",
        "genre",
        "description",
        "coverImageUrl",
        "ratingAvg",
        "ratingCount",
        "createdAt",
        "updatedAt",
    ],
    default_sort: "b.created_at",
};

const BOOK_FROM: &str = "books b JOIN genres g ON b.genre_id = g.id";

const BOOK_SELECT: &str = "b.id, b.title, b.author, b.genre_id, g.name AS genre_name, \
     b.description, b.cover_image_url, b.rating_avg, b.rating_count, \
     b.is_deleted, b.created_at, b.updated_at";

/// Translate list parameters for the book surface
pub fn list_query(params: &IndexMap<String, String>) -> AppResult<ListQuery> {
    ListQuery::build(&BOOK_SCHEMA, params)
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check if a live book already carries this title, case-insensitively
    pub async fn title_exists(&self, title: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE LOWER(title) = LOWER($1) AND is_deleted = FALSE AND id != $2)",
            )
            .bind(title)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE LOWER(title) = LOWER($1) AND is_deleted = FALSE)",
            )
            .bind(title)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Check if a live book exists (referential check for reviews and libraries)
    pub async fn exists_live(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author, genre_id, description, cover_image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.genre)
        .bind(&book.description)
        .bind(&book.cover_image_url)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Get book by ID with its genre embedded, excluding deleted books
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        let sql = format!(
            "SELECT {} FROM {} WHERE b.id = $1 AND b.is_deleted = FALSE",
            BOOK_SELECT, BOOK_FROM
        );
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        Ok(row.into())
    }

    /// Get book by ID regardless of the deleted flag
    async fn get_by_id_any(&self, id: Uuid) -> AppResult<Book> {
        let sql = format!(
            "SELECT {} FROM {} WHERE b.id = $1",
            BOOK_SELECT, BOOK_FROM
        );
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        Ok(row.into())
    }

    /// List books over the effective filter, with the matching total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Book>, i64)> {
        let (rows, total) = query
            .fetch_page::<BookRow>(&self.pool, BOOK_FROM, BOOK_SELECT)
            .await?;
        Ok((rows.into_iter().map(Book::from).collect(), total))
    }

    /// Replace a book's fields
    pub async fn update(&self, id: Uuid, book: &UpdateBook) -> AppResult<Book> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET title = $2, author = $3, genre_id = $4, description = $5,
                cover_image_url = $6, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.genre)
        .bind(&book.description)
        .bind(&book.cover_image_url)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(AppError::NotFound("Book not found".to_string())),
        }
    }

    /// Soft delete a book; a second call sees no matching row
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Book> {
        let deleted: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE books SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match deleted {
            Some(id) => self.get_by_id_any(id).await,
            None => Err(AppError::NotFound("Book not found".to_string())),
        }
    }
}
