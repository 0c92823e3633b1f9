//! Reading goals repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::reading_goal::{CreateReadingGoal, ReadingGoal, ReadingGoalRow, UpdateReadingGoal},
};

/// Partial unique index that serializes concurrent activations
const ONE_ACTIVE_CONSTRAINT: &str = "reading_goals_one_active_idx";

fn is_active_conflict(err: &AppError) -> bool {
    match err {
        AppError::Database(sqlx::Error::Database(db)) => {
            db.constraint() == Some(ONE_ACTIVE_CONSTRAINT)
        }
        _ => false,
    }
}

#[derive(Clone)]
pub struct ReadingGoalsRepository {
    pool: Pool<Postgres>,
}

impl ReadingGoalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a goal as the user's single active one
    ///
    /// Deactivation and insert run in one transaction; the partial unique
    /// index backs the invariant under concurrency. When two activations
    /// race, the loser lands on the index and the sequence is retried once
    /// against the then-current winner.
    pub async fn create_active(
        &self,
        user_id: Uuid,
        goal: &CreateReadingGoal,
    ) -> AppResult<ReadingGoal> {
        match self.try_create_active(user_id, goal).await {
            Err(err) if is_active_conflict(&err) => {
                self.try_create_active(user_id, goal).await
            }
            other => other,
        }
    }

    async fn try_create_active(
        &self,
        user_id: Uuid,
        goal: &CreateReadingGoal,
    ) -> AppResult<ReadingGoal> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE reading_goals SET is_active = FALSE, updated_at = NOW()
            WHERE user_id = $1 AND is_active = TRUE AND is_deleted = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ReadingGoalRow>(
            r#"
            INSERT INTO reading_goals (user_id, period, target_book, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(goal.period.as_str())
        .bind(goal.target_book)
        .bind(goal.start_date)
        .bind(goal.end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// All of a user's live goals, newest first
    pub async fn my_goals(&self, user_id: Uuid) -> AppResult<Vec<ReadingGoal>> {
        let rows = sqlx::query_as::<_, ReadingGoalRow>(
            r#"
            SELECT * FROM reading_goals
            WHERE user_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReadingGoal::from).collect())
    }

    /// The user's active goal, if any
    pub async fn active_goal(&self, user_id: Uuid) -> AppResult<Option<ReadingGoal>> {
        let row = sqlx::query_as::<_, ReadingGoalRow>(
            r#"
            SELECT * FROM reading_goals
            WHERE user_id = $1 AND is_active = TRUE AND is_deleted = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReadingGoal::from))
    }

    /// Update a goal the user owns; reactivation deactivates the others first
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: &UpdateReadingGoal,
    ) -> AppResult<ReadingGoal> {
        let mut tx = self.pool.begin().await?;

        if changes.is_active == Some(true) {
            sqlx::query(
                r#"
                UPDATE reading_goals SET is_active = FALSE, updated_at = NOW()
                WHERE user_id = $1 AND is_active = TRUE AND is_deleted = FALSE AND id != $2
                "#,
            )
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, ReadingGoalRow>(
            r#"
            UPDATE reading_goals
            SET target_book = COALESCE($3, target_book),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.target_book)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.is_active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Reading goal not found".to_string()))?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Soft delete a goal the user owns; the goal also leaves the active slot
    pub async fn soft_delete(&self, id: Uuid, user_id: Uuid) -> AppResult<ReadingGoal> {
        let row = sqlx::query_as::<_, ReadingGoalRow>(
            r#"
            UPDATE reading_goals
            SET is_deleted = TRUE, is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reading goal not found".to_string()))?;

        Ok(row.into())
    }
}
