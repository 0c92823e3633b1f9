//! Users repository for database operations

use indexmap::IndexMap;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, User, UserRow},
    query::{Column, ColumnKind, ListQuery, QuerySchema},
};

pub static USER_SCHEMA: QuerySchema = QuerySchema {
    base: &["u.is_deleted = FALSE"],
    filterable: &[
        Column {
            key: "role",
            column: "u.role",
            kind: ColumnKind::Text,
        },
        Column {
            key: "isVerified",
            column: "u.is_verified",
            kind: ColumnKind::Bool,
        },
    ],
    searchable: &["u.name", "u.email"],
    sortable: &[
        ("name", "u.name"),
        ("email", "u.email"),
        ("createdAt", "u.created_at"),
    ],
    selectable: &[
        "id",
        "name",
        "email",
        "role",
        "isVerified",
        "createdAt",
        "updatedAt",
    ],
    default_sort: "u.created_at",
};

/// Translate list parameters for the user surface
pub fn list_query(params: &IndexMap<String, String>) -> AppResult<ListQuery> {
    ListQuery::build(&USER_SCHEMA, params)
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID, excluding deleted accounts
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(row.into())
    }

    /// Get user by email (primary authentication lookup)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Check if email already belongs to a live account
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check if any live admin account exists
    pub async fn admin_exists(&self) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'Admin' AND is_deleted = FALSE)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new user
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// List users over the effective filter, with the matching total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<User>, i64)> {
        let (rows, total) = query
            .fetch_page::<UserRow>(&self.pool, "users u", "u.*")
            .await?;
        Ok((rows.into_iter().map(User::from).collect(), total))
    }

    /// Change a user's role
    pub async fn update_role(&self, id: Uuid, role: Role) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(row.into())
    }

    /// Soft delete a user; a second call sees no matching row
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(row.into())
    }
}
