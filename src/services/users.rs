//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{AuthResponse, LoginUser, RegisterUser, Role, User, UserClaims},
    query::PageMeta,
    repository::{users::list_query, Repository},
    services::serialize_rows,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account; everyone starts as an unverified User
    pub async fn register(&self, payload: RegisterUser) -> AppResult<User> {
        let name = payload.name.trim();
        let email = payload.email.trim();

        if self.repository.users.email_exists(email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let hash = self.hash_password(&payload.password)?;
        self.repository
            .users
            .create(name, email, &hash, Role::User)
            .await
    }

    /// Authenticate by email and password, returning the user and a token
    pub async fn login(&self, payload: LoginUser) -> AppResult<AuthResponse> {
        let user = self
            .repository
            .users
            .get_by_email(payload.email.trim())
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid email or password".to_string())
            })?;

        if !self.verify_password(&user, &payload.password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let claims = UserClaims::new(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResponse { user, token })
    }

    /// List users for administrators
    pub async fn list(
        &self,
        params: &IndexMap<String, String>,
    ) -> AppResult<(Vec<Value>, PageMeta)> {
        let query = list_query(params)?;
        let (users, total) = self.repository.users.list(&query).await?;
        let data = query.project(serialize_rows(users)?);
        Ok((data, query.meta(total)))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Change a user's role (admin only)
    pub async fn update_role(&self, id: Uuid, role: Role) -> AppResult<User> {
        self.repository.users.update_role(id, role).await
    }

    /// Soft delete a user (admin only)
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.soft_delete(id).await
    }

    /// Create the configured admin account when no live admin exists
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        if self.repository.users.admin_exists().await? {
            return Ok(None);
        }

        let hash = self.hash_password(password)?;
        let admin = self
            .repository
            .users
            .create("Administrator", email.trim(), &hash, Role::Admin)
            .await?;
        Ok(Some(admin))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
