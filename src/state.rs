//! Shared application state

use tower_cookies::Key;

use crate::provider::IdentityProvider;
use crate::store::{SessionStore, UserStore};

/// Application state handed to every route handler.
///
/// Constructed once at process start and injected into the router;
/// nothing here is ambient framework state.
pub struct AppState<P, U, S> {
    pub provider: P,
    pub user_store: U,
    pub session_store: S,
    /// Key for signing the session cookie, derived from the
    /// configured secret
    pub cookie_key: Key,
}

impl<P, U, S> AppState<P, U, S>
where
    P: IdentityProvider,
    U: UserStore,
    S: SessionStore,
{
    pub fn new(provider: P, user_store: U, session_store: S, session_secret: &str) -> Self {
        Self {
            provider,
            user_store,
            session_store,
            cookie_key: Key::derive_from(session_secret.as_bytes()),
        }
    }
}
