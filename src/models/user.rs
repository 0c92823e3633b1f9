//! User model, roles and JWT claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Internal row structure for database queries (with String role)
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password: String,
    role: String,
    is_verified: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role: row.role.parse().unwrap_or(Role::User),
            is_verified: row.is_verified,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2), never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUser {
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Role change request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRole {
    pub role: Role,
}

/// Login response payload
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let expires = now + Duration::hours(expiration_hours as i64);
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require one of the listed roles
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization("Forbidden".to_string()))
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::Admin])
    }

    /// Allow admins and the user the target id belongs to
    pub fn require_self_or_admin(&self, target: Uuid) -> Result<(), AppError> {
        if self.is_admin() || self.user_id == target {
            Ok(())
        } else {
            Err(AppError::Authorization("Forbidden".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Paul Atreides".to_string(),
            email: "paul@arrakis.example".to_string(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role,
            is_verified: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = test_user(Role::User);
        let claims = UserClaims::new(&user, 168);
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.email, user.email);
        assert_eq!(decoded.role, Role::User);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let claims = UserClaims::new(&test_user(Role::User), 1);
        let token = claims.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_require_role() {
        let admin = UserClaims::new(&test_user(Role::Admin), 1);
        let user = UserClaims::new(&test_user(Role::User), 1);

        assert!(admin.require_role(&[Role::Admin]).is_ok());
        assert!(user.require_role(&[Role::Admin]).is_err());
        assert!(user.require_role(&[Role::Admin, Role::User]).is_ok());
        assert!(user.require_admin().is_err());
    }

    #[test]
    fn test_require_self_or_admin() {
        let admin = UserClaims::new(&test_user(Role::Admin), 1);
        let user = UserClaims::new(&test_user(Role::User), 1);

        assert!(admin.require_self_or_admin(Uuid::new_v4()).is_ok());
        assert!(user.require_self_or_admin(user.user_id).is_ok());
        assert!(user.require_self_or_admin(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(test_user(Role::User)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("isVerified").is_some());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("User".parse::<Role>().unwrap(), Role::User);
        assert!("Librarian".parse::<Role>().is_err());
    }
}
