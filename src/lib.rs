//! BookWorm Library Tracking API
//!
//! A REST JSON API for tracking books, genres, reviews, tutorials,
//! per-user reading libraries and periodic reading goals, guarded by
//! role-based access control.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
