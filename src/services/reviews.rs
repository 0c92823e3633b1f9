//! Review management service

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, Review},
    query::PageMeta,
    repository::{reviews::approved_for_book_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a review for a book. New reviews always start pending.
    pub async fn create(&self, user_id: Uuid, payload: CreateReview) -> AppResult<Review> {
        if !self.repository.books.exists_live(payload.book).await? {
            return Err(AppError::BadRequest("Book not found".to_string()));
        }
        self.repository.reviews.create(user_id, &payload).await
    }

    /// List approved reviews for a book. A missing book yields an empty list.
    pub async fn approved_by_book(
        &self,
        book_id: Uuid,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = approved_for_book_query(book_id, params)?;
        let (reviews, total) = self.repository.reviews.list_approved(&query).await?;
        let data = query.project(serialize_rows(reviews)?);
        Ok((data, query.meta(total)))
    }

    /// Approve a pending review. Approving twice is a no-op.
    pub async fn approve(&self, id: Uuid) -> AppResult<Review> {
        self.repository.reviews.approve(id).await
    }
}
