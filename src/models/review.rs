//! Review model and approval states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Review moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}

/// Reviewer as embedded in review responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewerRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Internal row structure for review queries joined with the reviewer
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    user_name: String,
    user_email: String,
    book_id: Uuid,
    rating: i32,
    comment: Option<String>,
    status: String,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user: ReviewerRef {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            book: row.book_id,
            rating: row.rating,
            comment: row.comment,
            status: row.status.parse().unwrap_or(ReviewStatus::Pending),
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full review model from database
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: ReviewerRef,
    pub book: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub status: ReviewStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create review request; the reviewer comes from the token
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub book: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}
