//! Reading goal endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        reading_goal::{CreateReadingGoal, GoalProgress, ReadingGoal, UpdateReadingGoal},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Create a reading goal
///
/// The new goal becomes the caller's only active goal; any previously
/// active goal is deactivated in the same transaction.
#[utoipa::path(
    post,
    path = "/reading-goal",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    request_body = CreateReadingGoal,
    responses(
        (status = 201, description = "Goal created and activated", body = ReadingGoal),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Reserved to the User role")
    )
)]
pub async fn create_goal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateReadingGoal>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReadingGoal>>)> {
    claims.require_role(&[Role::User])?;

    let goal = state
        .services
        .reading_goals
        .create(claims.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(goal))))
}

/// List a user's goals, newest first
#[utoipa::path(
    get,
    path = "/reading-goal/user/{userId}",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    params(
        ("userId" = Uuid, Path, description = "Goal owner id")
    ),
    responses(
        (status = 200, description = "Goals for the user", body = [ReadingGoal]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn user_goals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<ReadingGoal>>>> {
    claims.require_role(&[Role::Admin, Role::User])?;

    let goals = state.services.reading_goals.my_goals(user_id).await?;
    Ok(Json(ApiResponse::new(goals)))
}

/// Get a user's active goal, if any
#[utoipa::path(
    get,
    path = "/reading-goal/active/{userId}",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    params(
        ("userId" = Uuid, Path, description = "Goal owner id")
    ),
    responses(
        (status = 200, description = "Active goal, or null when none", body = ReadingGoal),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn active_goal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Option<ReadingGoal>>>> {
    claims.require_role(&[Role::Admin, Role::User])?;

    let goal = state.services.reading_goals.active_goal(user_id).await?;
    Ok(Json(ApiResponse::new(goal)))
}

/// Progress against a user's active goal
#[utoipa::path(
    get,
    path = "/reading-goal/active/{userId}/progress",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    params(
        ("userId" = Uuid, Path, description = "Goal owner id")
    ),
    responses(
        (status = 200, description = "Progress summary, or null when no active goal", body = GoalProgress),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn active_goal_progress(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Option<GoalProgress>>>> {
    claims.require_role(&[Role::Admin, Role::User])?;

    let progress = state
        .services
        .reading_goals
        .active_goal_progress(user_id)
        .await?;
    Ok(Json(ApiResponse::new(progress)))
}

/// Update one of the caller's goals
#[utoipa::path(
    patch,
    path = "/reading-goal/{id}",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Goal id")
    ),
    request_body = UpdateReadingGoal,
    responses(
        (status = 200, description = "Goal updated", body = ReadingGoal),
        (status = 403, description = "Reserved to the User role"),
        (status = 404, description = "Reading goal not found")
    )
)]
pub async fn update_goal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateReadingGoal>,
) -> AppResult<Json<ApiResponse<ReadingGoal>>> {
    claims.require_role(&[Role::User])?;

    let goal = state
        .services
        .reading_goals
        .update(id, claims.user_id, payload)
        .await?;
    Ok(Json(ApiResponse::new(goal)))
}

/// Soft delete one of the caller's goals
#[utoipa::path(
    delete,
    path = "/reading-goal/{id}",
    tag = "reading-goals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Goal id")
    ),
    responses(
        (status = 200, description = "Goal soft deleted", body = ReadingGoal),
        (status = 403, description = "Reserved to the User role"),
        (status = 404, description = "Reading goal not found")
    )
)]
pub async fn delete_goal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReadingGoal>>> {
    claims.require_role(&[Role::User])?;

    let goal = state
        .services
        .reading_goals
        .soft_delete(id, claims.user_id)
        .await?;
    Ok(Json(ApiResponse::new(goal)))
}
