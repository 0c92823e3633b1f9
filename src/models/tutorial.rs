//! Tutorial model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: Uuid,
    pub title: String,
    pub video_url: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create tutorial request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorial {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(url(message = "Video must be a valid URL"))]
    pub video_url: String,
    pub description: Option<String>,
}

/// Update tutorial request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTutorial {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(url(message = "Video must be a valid URL"))]
    pub video_url: Option<String>,
    pub description: Option<String>,
}
