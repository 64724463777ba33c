//! PostgreSQL implementations of the store contracts.

pub mod favorite;
pub mod notification;
pub mod resource;
pub mod share;
pub mod user;

pub use favorite::FavoriteRepository;
pub use notification::NotificationRepository;
pub use resource::ResourceRepository;
pub use share::ShareRepository;
pub use user::UserRepository;

/// Whether a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
