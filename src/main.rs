//! BookWorm Server - Library Tracking API

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookworm_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            format!("bookworm_server={},tower_http=debug", config.logging.level).into()
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BookWorm Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // A fresh deployment has no way to mint an admin through the API;
    // seed one from config when none exists yet.
    if let (Some(email), Some(password)) = (
        config.bootstrap.admin_email.as_deref(),
        config.bootstrap.admin_password.as_deref(),
    ) {
        match services.users.bootstrap_admin(email, password).await {
            Ok(Some(admin)) => tracing::info!("Bootstrapped admin account {}", admin.email),
            Ok(None) => tracing::debug!("Admin account already present, bootstrap skipped"),
            Err(err) => tracing::error!("Admin bootstrap failed: {}", err),
        }
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Users
        .route("/user/register", post(api::users::register))
        .route("/user/login", post(api::users::login))
        .route("/user", get(api::users::list_users))
        .route("/user/:id", get(api::users::get_user))
        .route("/user/:id", patch(api::users::update_user_role))
        .route("/user/:id", delete(api::users::delete_user))
        // Genres
        .route("/genre", get(api::genres::list_genres))
        .route("/genre", post(api::genres::create_genre))
        .route("/genre/:id", patch(api::genres::update_genre))
        .route("/genre/:id", delete(api::genres::delete_genre))
        // Books
        .route("/book", get(api::books::list_books))
        .route("/book", post(api::books::create_book))
        .route("/book/:id", get(api::books::get_book))
        .route("/book/:id", patch(api::books::update_book))
        .route("/book/:id", delete(api::books::delete_book))
        // Tutorials
        .route("/tutorial", get(api::tutorials::list_tutorials))
        .route("/tutorial", post(api::tutorials::create_tutorial))
        .route("/tutorial/:id", patch(api::tutorials::update_tutorial))
        .route("/tutorial/:id", delete(api::tutorials::delete_tutorial))
        // Reviews
        .route("/review", post(api::reviews::create_review))
        .route("/review/book/:bookId", get(api::reviews::list_book_reviews))
        .route("/review/:id/approve", patch(api::reviews::approve_review))
        // User library
        .route("/user-library", post(api::library::add_to_library))
        .route("/user-library/me", get(api::library::my_library))
        .route("/user-library/:id", patch(api::library::update_library_entry))
        // Reading goals
        .route("/reading-goal", post(api::reading_goals::create_goal))
        .route("/reading-goal/user/:userId", get(api::reading_goals::user_goals))
        .route("/reading-goal/active/:userId", get(api::reading_goals::active_goal))
        .route(
            "/reading-goal/active/:userId/progress",
            get(api::reading_goals::active_goal_progress),
        )
        .route("/reading-goal/:id", patch(api::reading_goals::update_goal))
        .route("/reading-goal/:id", delete(api::reading_goals::delete_goal))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
