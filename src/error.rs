//! Portal error types

use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The callback's state value is missing, unknown, expired, or
    /// already consumed (anti-forgery check).
    #[error("State parameter missing or not recognized")]
    InvalidState,

    /// The provider reported a denial, or the token exchange /
    /// profile fetch failed.
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// The provider's profile lacks a verified email address.
    #[error("Profile has no verified email")]
    MalformedProfile,

    /// The user store could not be reached or the query failed.
    /// Best-effort: callers log this and let the login complete.
    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    /// Session teardown failed. Best-effort: logged and swallowed,
    /// logout always succeeds from the user's perspective.
    #[error("Session teardown failed: {0}")]
    SessionDestroy(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Handshake failures are terminal for the attempt and are
        // surfaced only as a redirect, never as a structured error.
        match &self {
            AuthError::InvalidState | AuthError::MalformedProfile => {
                tracing::warn!(error = %self, "Login attempt rejected");
            }
            AuthError::Provider(_) => {
                tracing::warn!(error = %self, "Provider handshake failed");
            }
            AuthError::StoreUnavailable(_) | AuthError::SessionDestroy(_) => {
                tracing::error!(error = %self, "Best-effort operation surfaced as response");
            }
        }
        Redirect::to("/login").into_response()
    }
}
