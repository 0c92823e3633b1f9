//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, genres, health, library, reading_goals, reviews, tutorials, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookWorm API",
        version = "1.0.0",
        description = "Library Tracking REST API",
        license(name = "MIT"),
        contact(name = "BookWorm Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::register,
        users::login,
        users::list_users,
        users::get_user,
        users::update_user_role,
        users::delete_user,
        // Genres
        genres::list_genres,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Tutorials
        tutorials::list_tutorials,
        tutorials::create_tutorial,
        tutorials::update_tutorial,
        tutorials::delete_tutorial,
        // Reviews
        reviews::create_review,
        reviews::list_book_reviews,
        reviews::approve_review,
        // Library
        library::add_to_library,
        library::my_library,
        library::update_library_entry,
        // Reading goals
        reading_goals::create_goal,
        reading_goals::user_goals,
        reading_goals::active_goal,
        reading_goals::active_goal_progress,
        reading_goals::update_goal,
        reading_goals::delete_goal,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterUser,
            crate::models::user::LoginUser,
            crate::models::user::UpdateUserRole,
            crate::models::user::AuthResponse,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::genre::UpdateGenre,
            // Books
            crate::models::book::Book,
            crate::models::book::GenreRef,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Tutorials
            crate::models::tutorial::Tutorial,
            crate::models::tutorial::CreateTutorial,
            crate::models::tutorial::UpdateTutorial,
            // Reviews
            crate::models::review::Review,
            crate::models::review::ReviewStatus,
            crate::models::review::ReviewerRef,
            crate::models::review::CreateReview,
            // Library
            crate::models::library::LibraryEntry,
            crate::models::library::Shelf,
            crate::models::library::AddToLibrary,
            crate::models::library::UpdateLibraryEntry,
            // Reading goals
            crate::models::reading_goal::ReadingGoal,
            crate::models::reading_goal::GoalPeriod,
            crate::models::reading_goal::CreateReadingGoal,
            crate::models::reading_goal::UpdateReadingGoal,
            crate::models::reading_goal::GoalProgress,
            // Shared
            crate::query::PageMeta,
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, login and user management"),
        (name = "genres", description = "Genre management"),
        (name = "books", description = "Book catalog"),
        (name = "tutorials", description = "Tutorial management"),
        (name = "reviews", description = "Book reviews and approval"),
        (name = "library", description = "Per-user reading library"),
        (name = "reading-goals", description = "Periodic reading goals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
