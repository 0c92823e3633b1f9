//! Repository layer for database operations

pub mod books;
pub mod genres;
pub mod library;
pub mod reading_goals;
pub mod reviews;
pub mod tutorials;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub genres: genres::GenresRepository,
    pub books: books::BooksRepository,
    pub tutorials: tutorials::TutorialsRepository,
    pub reviews: reviews::ReviewsRepository,
    pub library: library::LibraryRepository,
    pub reading_goals: reading_goals::ReadingGoalsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            tutorials: tutorials::TutorialsRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            library: library::LibraryRepository::new(pool.clone()),
            reading_goals: reading_goals::ReadingGoalsRepository::new(pool.clone()),
            pool,
        }
    }

    /// One round-trip against the store
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
