//! Data models for BookWorm

pub mod book;
pub mod genre;
pub mod library;
pub mod reading_goal;
pub mod review;
pub mod tutorial;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use genre::Genre;
pub use library::{LibraryEntry, Shelf};
pub use reading_goal::{GoalPeriod, ReadingGoal};
pub use review::{Review, ReviewStatus};
pub use tutorial::Tutorial;
pub use user::{Role, User, UserClaims};
