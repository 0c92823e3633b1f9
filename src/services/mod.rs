//! Business logic services

pub mod books;
pub mod genres;
pub mod library;
pub mod reading_goals;
pub mod reviews;
pub mod tutorials;
pub mod users;

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub tutorials: tutorials::TutorialsService,
    pub reviews: reviews::ReviewsService,
    pub library: library::LibraryService,
    pub reading_goals: reading_goals::ReadingGoalsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            tutorials: tutorials::TutorialsService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            library: library::LibraryService::new(repository.clone()),
            reading_goals: reading_goals::ReadingGoalsService::new(repository.clone()),
            repository,
        }
    }

    /// One store round-trip; readiness gates on it
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Serialize typed rows for the response envelope, ahead of projection
pub(crate) fn serialize_rows<T: Serialize>(rows: Vec<T>) -> AppResult<Vec<Value>> {
    rows.into_iter()
        .map(|row| {
            serde_json::to_value(row)
                .map_err(|e| AppError::Internal(format!("Failed to serialize response: {}", e)))
        })
        .collect()
}
