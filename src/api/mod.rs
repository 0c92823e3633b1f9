//! API handlers for BookWorm REST endpoints

pub mod books;
pub mod genres;
pub mod health;
pub mod library;
pub mod openapi;
pub mod reading_goals;
pub mod reviews;
pub mod tutorials;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::{error::AppError, models::user::UserClaims, query::PageMeta, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Unauthorized".to_string()))?;

        // Check for Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Unauthorized".to_string()))?;

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid token".to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body extractor that runs field validation before the handler runs
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Success envelope shared by every endpoint
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            meta: None,
            data,
        }
    }

    pub fn with_message(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            meta: None,
            data,
        }
    }

    pub fn paged(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            message: None,
            meta: Some(meta),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_skips_absent_fields() {
        let json = serde_json::to_value(ApiResponse::new(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("message").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_envelope_with_message() {
        let json = serde_json::to_value(ApiResponse::with_message("Created", "x")).unwrap();
        assert_eq!(json["message"], "Created");
    }

    #[test]
    fn test_envelope_paged() {
        let meta = PageMeta {
            page: 2,
            limit: 10,
            total: 35,
        };
        let json = serde_json::to_value(ApiResponse::paged(vec![1, 2], meta)).unwrap();
        assert_eq!(json["meta"]["page"], 2);
        assert_eq!(json["meta"]["total"], 35);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
