//! Reading goal model and progress report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Period a goal spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl GoalPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPeriod::Weekly => "weekly",
            GoalPeriod::Monthly => "monthly",
            GoalPeriod::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(GoalPeriod::Weekly),
            "monthly" => Ok(GoalPeriod::Monthly),
            "yearly" => Ok(GoalPeriod::Yearly),
            _ => Err(format!("Invalid goal period: {}", s)),
        }
    }
}

/// Internal row structure for goal queries (with String period)
#[derive(Debug, Clone, FromRow)]
pub struct ReadingGoalRow {
    id: Uuid,
    user_id: Uuid,
    period: String,
    target_book: i32,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReadingGoalRow> for ReadingGoal {
    fn from(row: ReadingGoalRow) -> Self {
        ReadingGoal {
            id: row.id,
            user: row.user_id,
            period: row.period.parse().unwrap_or(GoalPeriod::Monthly),
            target_book: row.target_book,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full reading goal model from database
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoal {
    pub id: Uuid,
    pub user: Uuid,
    pub period: GoalPeriod,
    pub target_book: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create goal request; the owner comes from the token
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingGoal {
    pub period: GoalPeriod,
    #[validate(range(min = 1, message = "Target must be at least 1 book"))]
    pub target_book: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Update goal request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReadingGoal {
    #[validate(range(min = 1, message = "Target must be at least 1 book"))]
    pub target_book: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Progress report for the active goal
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: ReadingGoal,
    pub completed_books: i64,
    pub remaining: i64,
    pub percentage: i64,
}
