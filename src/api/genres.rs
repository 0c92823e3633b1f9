//! Genre endpoints

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
    models::genre::{CreateGenre, Genre, UpdateGenre},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// List genres
#[utoipa::path(
    get,
    path = "/genre",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("searchTerm" = Option<String>, Query, description = "Search in name"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)"),
        ("fields" = Option<String>, Query, description = "Comma-separated projection")
    ),
    responses(
        (status = 200, description = "Paged list of genres", body = [Genre]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let (genres, meta) = state.services.genres.list(&params).await?;
    Ok(Json(ApiResponse::paged(genres, meta)))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genre",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input or genre already exists"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<ApiResponse<Genre>>)> {
    claims.require_admin()?;

    let genre = state.services.genres.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Genre created", genre)),
    ))
}

/// Rename a genre
#[utoipa::path(
    patch,
    path = "/genre/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Genre id")
    ),
    request_body = UpdateGenre,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateGenre>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    claims.require_admin()?;

    let genre = state.services.genres.update(id, payload).await?;
    Ok(Json(ApiResponse::with_message("Genre updated", genre)))
}

/// Soft delete a genre
#[utoipa::path(
    delete,
    path = "/genre/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Genre id")
    ),
    responses(
        (status = 200, description = "Genre soft deleted", body = Genre),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    claims.require_admin()?;

    let genre = state.services.genres.soft_delete(id).await?;
    Ok(Json(ApiResponse::with_message("Genre deleted (soft)", genre)))
}
