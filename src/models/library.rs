//! Per-user reading library model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::book::{Book, GenreRef};

/// Shelf a library entry sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Shelf {
    Want,
    Reading,
    Completed,
}

impl Shelf {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::Want => "want",
            Shelf::Reading => "reading",
            Shelf::Completed => "completed",
        }
    }
}

impl Default for Shelf {
    fn default() -> Self {
        Shelf::Want
    }
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Shelf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want" => Ok(Shelf::Want),
            "reading" => Ok(Shelf::Reading),
            "completed" => Ok(Shelf::Completed),
            _ => Err(format!("Invalid shelf: {}", s)),
        }
    }
}

/// Internal row structure for library queries joined with the book
#[derive(Debug, Clone, FromRow)]
pub struct LibraryEntryRow {
    id: Uuid,
    user_id: Uuid,
    shelf: String,
    progress: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    book_id: Uuid,
    book_title: String,
    book_author: String,
    genre_id: Uuid,
    genre_name: String,
    book_description: Option<String>,
    book_cover_image_url: Option<String>,
    book_rating_avg: f64,
    book_rating_count: i32,
    book_is_deleted: bool,
    book_created_at: DateTime<Utc>,
    book_updated_at: DateTime<Utc>,
}

impl From<LibraryEntryRow> for LibraryEntry {
    fn from(row: LibraryEntryRow) -> Self {
        LibraryEntry {
            id: row.id,
            user: row.user_id,
            book: Book {
                id: row.book_id,
                title: row.book_title,
                author: row.book_author,
                genre: GenreRef {
                    id: row.genre_id,
                    name: row.genre_name,
                },
                description: row.book_description,
                cover_image_url: row.book_cover_image_url,
                rating_avg: row.book_rating_avg,
                rating_count: row.book_rating_count,
                is_deleted: row.book_is_deleted,
                created_at: row.book_created_at,
                updated_at: row.book_updated_at,
            },
            shelf: row.shelf.parse().unwrap_or_default(),
            progress: row.progress,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Library entry with the book embedded
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: Uuid,
    pub user: Uuid,
    pub book: Book,
    pub shelf: Shelf,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add a book to the caller's library
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToLibrary {
    pub book: Uuid,
    pub shelf: Option<Shelf>,
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,
}

/// Move a library entry between shelves or record progress
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLibraryEntry {
    pub shelf: Option<Shelf>,
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,
}
