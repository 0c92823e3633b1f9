//! Book catalog service

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    query::PageMeta,
    repository::{books::list_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book; titles are unique among live books, case-insensitively
    pub async fn create(&self, payload: CreateBook) -> AppResult<Book> {
        if self
            .repository
            .books
            .title_exists(payload.title.trim(), None)
            .await?
        {
            return Err(AppError::Conflict("Book title already exists".to_string()));
        }

        if !self.repository.genres.exists_live(payload.genre).await? {
            return Err(AppError::BadRequest("Genre not found".to_string()));
        }

        self.repository.books.create(&payload).await
    }

    /// List books
    pub async fn list(
        &self,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = list_query(params)?;
        let (books, total) = self.repository.books.list(&query).await?;
        let data = query.project(serialize_rows(books)?);
        Ok((data, query.meta(total)))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Replace a book's fields
    pub async fn update(&self, id: Uuid, payload: UpdateBook) -> AppResult<Book> {
        if self
            .repository
            .books
            .title_exists(payload.title.trim(), Some(id))
            .await?
        {
            return Err(AppError::Conflict("Book title already exists".to_string()));
        }

        if !self.repository.genres.exists_live(payload.genre).await? {
            return Err(AppError::BadRequest("Genre not found".to_string()));
        }

        self.repository.books.update(id, &payload).await
    }

    /// Soft delete a book
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.soft_delete(id).await
    }
}
