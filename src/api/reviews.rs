//! Review endpoints

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
    models::review::{CreateReview, Review},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Submit a review for a book
#[utoipa::path(
    post,
    path = "/review",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created (pending approval)", body = Review),
        (status = 400, description = "Invalid input or unknown book"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateReview>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let review = state
        .services
        .reviews
        .create(claims.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(review))))
}

/// List approved reviews for a book
#[utoipa::path(
    get,
    path = "/review/book/{bookId}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("bookId" = Uuid, Path, description = "Book id"),
        ("searchTerm" = Option<String>, Query, description = "Search in comments"),
        ("rating" = Option<i32>, Query, description = "Filter by rating"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Paged list of approved reviews", body = [Review]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_book_reviews(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(book_id): Path<Uuid>,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let (reviews, meta) = state
        .services
        .reviews
        .approved_by_book(book_id, &params)
        .await?;
    Ok(Json(ApiResponse::paged(reviews, meta)))
}

/// Approve a pending review
#[utoipa::path(
    patch,
    path = "/review/{id}/approve",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review approved", body = Review),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Review not found or deleted")
    )
)]
pub async fn approve_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    claims.require_admin()?;

    let review = state.services.reviews.approve(id).await?;
    Ok(Json(ApiResponse::new(review)))
}
