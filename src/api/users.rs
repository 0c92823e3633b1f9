//! User registration, login and management endpoints

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
    models::user::{AuthResponse, LoginUser, RegisterUser, UpdateUserRole, User},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Register a new account
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input or email already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.services.users.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User registered successfully", user)),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "users",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    ValidatedJson(payload): ValidatedJson<LoginUser>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let auth = state.services.users.login(payload).await?;
    Ok(Json(ApiResponse::with_message("Login success", auth)))
}

/// List users with search, filters and pagination
#[utoipa::path(
    get,
    path = "/user",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("searchTerm" = Option<String>, Query, description = "Search in name and email"),
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("isVerified" = Option<bool>, Query, description = "Filter by verification state"),
        ("sort" = Option<String>, Query, description = "Sort keys, '-' prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Rows per page (default: 10, max: 100)"),
        ("fields" = Option<String>, Query, description = "Comma-separated projection")
    ),
    responses(
        (status = 200, description = "Paged list of users", body = [User]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(params): Query<IndexMap<String, String>>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    claims.require_admin()?;

    let (users, meta) = state.services.users.list(&params).await?;
    Ok(Json(ApiResponse::paged(users, meta)))
}

/// Get a single user
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 403, description = "Not the user or an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_self_or_admin(id)?;

    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(user)))
}

/// Change a user's role
#[utoipa::path(
    patch,
    path = "/user/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = UpdateUserRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRole>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_admin()?;

    let user = state.services.users.update_role(id, payload.role).await?;
    Ok(Json(ApiResponse::with_message("User role updated", user)))
}

/// Soft delete a user
#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User soft deleted", body = User),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_admin()?;

    let user = state.services.users.soft_delete(id).await?;
    Ok(Json(ApiResponse::with_message("User deleted (soft)", user)))
}
