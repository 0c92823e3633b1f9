//! Periodic reading goal service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::reading_goal::{CreateReadingGoal, GoalProgress, ReadingGoal, UpdateReadingGoal},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadingGoalsService {
    repository: Repository,
}

impl ReadingGoalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a goal and make it the only active one for the caller
    pub async fn create(&self, user_id: Uuid, payload: CreateReadingGoal) -> AppResult<ReadingGoal> {
        self.repository.reading_goals.create_active(user_id, &payload).await
    }

    /// List the caller's goals, newest first
    pub async fn my_goals(&self, user_id: Uuid) -> AppResult<Vec<ReadingGoal>> {
        self.repository.reading_goals.my_goals(user_id).await
    }

    /// Fetch a user's active goal. Absent is not an error.
    pub async fn active_goal(&self, user_id: Uuid) -> AppResult<Option<ReadingGoal>> {
        self.repository.reading_goals.active_goal(user_id).await
    }

    /// Progress against a user's active goal, counting library entries
    /// completed inside the goal window. Absent when no goal is active.
    pub async fn active_goal_progress(&self, user_id: Uuid) -> AppResult<Option<GoalProgress>> {
        let Some(goal) = self.repository.reading_goals.active_goal(user_id).await? else {
            return Ok(None);
        };
        let completed = self
            .repository
            .library
            .count_completed_between(user_id, goal.start_date, goal.end_date)
            .await?;
        let (remaining, percentage) = compute_progress(goal.target_book, completed);
        Ok(Some(GoalProgress {
            goal,
            completed_books: completed,
            remaining,
            percentage,
        }))
    }

    /// Update one of the caller's goals
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: UpdateReadingGoal,
    ) -> AppResult<ReadingGoal> {
        self.repository.reading_goals.update(id, user_id, &changes).await
    }

    /// Soft delete one of the caller's goals
    pub async fn soft_delete(&self, id: Uuid, user_id: Uuid) -> AppResult<ReadingGoal> {
        self.repository.reading_goals.soft_delete(id, user_id).await
    }
}

/// Remaining books and completion percentage for a goal.
/// Percentage is clamped to 100 once the target is passed.
fn compute_progress(target: i32, completed: i64) -> (i64, i64) {
    let remaining = (i64::from(target) - completed).max(0);
    let percentage = if target <= 0 {
        0
    } else {
        (((100 * completed) as f64 / f64::from(target)).round() as i64).min(100)
    };
    (remaining, percentage)
}
