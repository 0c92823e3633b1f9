//! Tutorial endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::tutorial::{CreateTutorial, Tutorial, UpdateTutorial},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// List tutorials
#[utoipa::path(
    get,
    path = "/tutorial",
    tag = "tutorials",
    security(("bearer_auth" = [])),
    params(
        ("searchTerm" = Option<String>, Query, description = "Search in title and description"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)"),
        ("fields" = Option<String>, Query, description = "Comma-separated projection")
    ),
    responses(
        (status = 200, description = "Paged list of tutorials", body = [Tutorial]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_tutorials(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let (tutorials, meta) = state.services.tutorials.list(&params).await?;
    Ok(Json(ApiResponse::paged(tutorials, meta)))
}

/// Create a tutorial
#[utoipa::path(
    post,
    path = "/tutorial",
    tag = "tutorials",
    security(("bearer_auth" = [])),
    request_body = CreateTutorial,
    responses(
        (status = 201, description = "Tutorial created", body = Tutorial),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_tutorial(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateTutorial>,
) -> AppResult<(StatusCode, Json<ApiResponse<Tutorial>>)> {
    claims.require_admin()?;

    let tutorial = state.services.tutorials.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(tutorial))))
}

/// Update a tutorial's fields
#[utoipa::path(
    patch,
    path = "/tutorial/{id}",
    tag = "tutorials",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Tutorial id")
    ),
    request_body = UpdateTutorial,
    responses(
        (status = 200, description = "Tutorial updated", body = Tutorial),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Tutorial not found")
    )
)]
pub async fn update_tutorial(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTutorial>,
) -> AppResult<Json<ApiResponse<Tutorial>>> {
    claims.require_admin()?;

    let tutorial = state.services.tutorials.update(id, payload).await?;
    Ok(Json(ApiResponse::new(tutorial)))
}

/// Soft delete a tutorial
#[utoipa::path(
    delete,
    path = "/tutorial/{id}",
    tag = "tutorials",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Tutorial id")
    ),
    responses(
        (status = 200, description = "Tutorial soft deleted", body = Tutorial),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Tutorial not found")
    )
)]
pub async fn delete_tutorial(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Tutorial>>> {
    claims.require_admin()?;

    let tutorial = state.services.tutorials.soft_delete(id).await?;
    Ok(Json(ApiResponse::new(tutorial)))
}
