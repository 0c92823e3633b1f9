//! Tutorials repository for database operations

use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::tutorial::{CreateTutorial, Tutorial, UpdateTutorial},
    query::{ListQuery, QuerySchema},
};

pub static TUTORIAL_SCHEMA: QuerySchema = QuerySchema {
    base: &["t.is_deleted = FALSE"],
    filterable: &[],
    searchable: &["t.title", "t.description"],
    sortable: &[("title", "t.title"), ("createdAt", "t.created_at")],
    selectable: &[
        "id",
        "title",
        "videoUrl",
        "description",
        "createdAt",
        "updatedAt",
    ],
    default_sort: "t.created_at",
};

/// Translate list parameters for the tutorial surface
pub fn list_query(params: &IndexMap<String, String>) -> AppResult<ListQuery> {
    ListQuery::build(&TUTORIAL_SCHEMA, params)
}

#[derive(Clone)]
pub struct TutorialsRepository {
    pool: Pool<Postgres>,
}

impl TutorialsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new tutorial
    pub async fn create(&self, tutorial: &CreateTutorial) -> AppResult<Tutorial> {
        let tutorial = sqlx::query_as::<_, Tutorial>(
            r#"
            INSERT INTO tutorials (title, video_url, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tutorial.title.trim())
        .bind(tutorial.video_url.trim())
        .bind(&tutorial.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(tutorial)
    }

    /// List tutorials over the effective filter, with the matching total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Tutorial>, i64)> {
        query
            .fetch_page::<Tutorial>(&self.pool, "tutorials t", "t.*")
            .await
    }

    /// Update a tutorial; absent fields keep their value
    pub async fn update(&self, id: Uuid, changes: &UpdateTutorial) -> AppResult<Tutorial> {
        let tutorial = sqlx::query_as::<_, Tutorial>(
            r#"
            UPDATE tutorials
            SET title = COALESCE($2, title),
                video_url = COALESCE($3, video_url),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.video_url.as_deref().map(str::trim))
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tutorial not found or deleted".to_string()))?;

        Ok(tutorial)
    }

    /// Soft delete a tutorial; a second call sees no matching row
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<Tutorial> {
        let tutorial = sqlx::query_as::<_, Tutorial>(
            r#"
            UPDATE tutorials SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Tutorial not found or already deleted".to_string())
        })?;

        Ok(tutorial)
    }
}
