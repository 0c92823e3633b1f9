//! Genre management service

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre, UpdateGenre},
    query::PageMeta,
    repository::{genres::list_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a genre; names are unique among live genres
    pub async fn create(&self, payload: CreateGenre) -> AppResult<Genre> {
        let name = payload.name.trim();

        if self.repository.genres.name_exists(name, None).await? {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }

        self.repository.genres.create(name).await
    }

    /// List genres
    pub async fn list(
        &self,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = list_query(params)?;
        let (genres, total) = self.repository.genres.list(&query).await?;
        let data = query.project(serialize_rows(genres)?);
        Ok((data, query.meta(total)))
    }

    /// Rename a genre
    pub async fn update(&self, id: Uuid, payload: UpdateGenre) -> AppResult<Genre> {
        let name = payload.name.trim();

        if self.repository.genres.name_exists(name, Some(id)).await? {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }

        self.repository.genres.update(id, name).await
    }

    /// Soft delete a genre
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Genre> {
        self.repository.genres.soft_delete(id).await
    }
}
