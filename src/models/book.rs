//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Genre as embedded in book responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreRef {
    pub id: Uuid,
    pub name: String,
}

/// Internal row structure for book queries joined with the genre
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    genre_id: Uuid,
    genre_name: String,
    description: Option<String>,
    cover_image_url: Option<String>,
    rating_avg: f64,
    rating_count: i32,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            genre: GenreRef {
                id: row.genre_id,
                name: row.genre_name,
            },
            description: row.description,
            cover_image_url: row.cover_image_url,
            rating_avg: row.rating_avg,
            rating_count: row.rating_count,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full book model from database
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: GenreRef,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    #[validate(length(min = 2, message = "Author must be at least 2 characters"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image_url: String,
    pub genre: Uuid,
}

/// Update book request (full replace, same shape as create)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    #[validate(length(min = 2, message = "Author must be at least 2 characters"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image_url: String,
    pub genre: Uuid,
}
