//! Storage abstractions for the portal

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemorySessionStore, InMemoryUserStore};
pub use models::*;
pub use sqlite::SqliteStore;

use crate::error::AuthError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AuthError>;

/// Trait for the persisted user directory
pub trait UserStore: Send + Sync {
    /// Insert a user if no row exists for that email; otherwise leave
    /// the existing row untouched. Safe under concurrent calls with
    /// the same email — uniqueness is enforced by the storage layer,
    /// not by application locks.
    fn upsert_user(&self, email: &str, name: &str) -> StoreResult<()>;

    /// Look up a user by email
    fn get_user(&self, email: &str) -> StoreResult<Option<UserRecord>>;
}

/// Trait for server-side session storage
pub trait SessionStore: Send + Sync {
    /// Create a new session bound to the given profile
    fn create(&self, profile: Profile) -> StoreResult<Session>;

    /// Get a session by id. Expired sessions are treated as absent.
    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>>;

    /// Delete a session. Succeeds even if the id was already invalid.
    fn delete(&self, session_id: &SessionId) -> StoreResult<()>;
}
