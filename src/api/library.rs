//! Personal reading library endpoints

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
    models::library::{AddToLibrary, LibraryEntry, UpdateLibraryEntry},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Add a book to the caller's library
#[utoipa::path(
    post,
    path = "/user-library",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = AddToLibrary,
    responses(
        (status = 201, description = "Book added to library", body = LibraryEntry),
        (status = 400, description = "Unknown book or already in the library"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn add_to_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<AddToLibrary>,
) -> AppResult<(StatusCode, Json<ApiResponse<LibraryEntry>>)> {
    let entry = state
        .services
        .library
        .add(claims.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(entry))))
}

/// List the caller's library
#[utoipa::path(
    get,
    path = "/user-library/me",
    tag = "library",
    security(("bearer_auth" = [])),
    params(
        ("searchTerm" = Option<String>, Query, description = "Search in book title and author"),
        ("shelf" = Option<String>, Query, description = "Filter by shelf (want/reading/completed)"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Paged list of library entries", body = [LibraryEntry]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let (entries, meta) = state
        .services
        .library
        .my_library(claims.user_id, &params)
        .await?;
    Ok(Json(ApiResponse::paged(entries, meta)))
}

/// Move an entry between shelves or record progress
#[utoipa::path(
    patch,
    path = "/user-library/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Library entry id")
    ),
    request_body = UpdateLibraryEntry,
    responses(
        (status = 200, description = "Entry updated", body = LibraryEntry),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Library entry not found")
    )
)]
pub async fn update_library_entry(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLibraryEntry>,
) -> AppResult<Json<ApiResponse<LibraryEntry>>> {
    let entry = state
        .services
        .library
        .update_entry(id, claims.user_id, payload)
        .await?;
    Ok(Json(ApiResponse::new(entry)))
}
