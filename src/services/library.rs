//! Personal reading library service

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::library::{AddToLibrary, LibraryEntry, UpdateLibraryEntry},
    query::PageMeta,
    repository::{library::my_library_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the caller's library
    pub async fn add(&self, user_id: Uuid, payload: AddToLibrary) -> AppResult<LibraryEntry> {
        if !self.repository.books.exists_live(payload.book).await? {
            return Err(AppError::BadRequest("Book not found".to_string()));
        }
        if self
            .repository
            .library
            .entry_exists(user_id, payload.book)
            .await?
        {
            return Err(AppError::Conflict(
                "Book is already in your library".to_string(),
            ));
        }
        self.repository.library.add(user_id, &payload).await
    }

    /// List the caller's library entries
    pub async fn my_library(
        &self,
        user_id: Uuid,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = my_library_query(user_id, params)?;
        let (entries, total) = self.repository.library.list(&query).await?;
        let data = query.project(serialize_rows(entries)?);
        Ok((data, query.meta(total)))
    }

    /// Update shelf or progress on one of the caller's entries
    pub async fn update_entry(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: UpdateLibraryEntry,
    ) -> AppResult<LibraryEntry> {
        self.repository
            .library
            .update_entry(id, user_id, &changes)
            .await
    }
}
