//! Tutorial management service

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::tutorial::{CreateTutorial, Tutorial, UpdateTutorial},
    query::PageMeta,
    repository::{tutorials::list_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct TutorialsService {
    repository: Repository,
}

impl TutorialsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a tutorial
    pub async fn create(&self, payload: CreateTutorial) -> AppResult<Tutorial> {
        self.repository.tutorials.create(&payload).await
    }

    /// List tutorials
    pub async fn list(
        &self,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = list_query(params)?;
        let (tutorials, total) = self.repository.tutorials.list(&query).await?;
        let data = query.project(serialize_rows(tutorials)?);
        Ok((data, query.meta(total)))
    }

    /// Update a tutorial
    pub async fn update(&self, id: Uuid, payload: UpdateTutorial) -> AppResult<Tutorial> {
        self.repository.tutorials.update(id, &payload).await
    }

    /// Soft delete a tutorial
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Tutorial> {
        self.repository.tutorials.soft_delete(id).await
    }
}
