//! Book catalog endpoints

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
    models::book::{Book, CreateBook, UpdateBook},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// List books with search, filters and pagination
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("searchTerm" = Option<String>, Query, description = "Search in title, author and description"),
        ("genre" = Option<Uuid>, Query, description = "Filter by genre id"),
        ("author" = Option<String>, Query, description = "Filter by exact author"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)"),
        ("fields" = Option<String>, Query, description = "Comma-separated projection")
    ),
    responses(
        (status = 200, description = "Paged list of books", body = [Book]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let (books, meta) = state.services.books.list(&params).await?;
    Ok(Json(ApiResponse::paged(books, meta)))
}

/// Get a single book
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(book)))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input, unknown genre or duplicate title"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    claims.require_admin()?;

    let book = state.services.books.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Book created successfully", book)),
    ))
}

/// Replace a book's fields
#[utoipa::path(
    patch,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book id")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    claims.require_admin()?;

    let book = state.services.books.update(id, payload).await?;
    Ok(Json(ApiResponse::with_message("Book updated", book)))
}

/// Soft delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book soft deleted", body = Book),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Book>>> {
    claims.require_admin()?;

    let book = state.services.books.soft_delete(id).await?;
    Ok(Json(ApiResponse::with_message("Book deleted (soft)", book)))
}
