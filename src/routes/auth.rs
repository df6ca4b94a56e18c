//! Provider handshake endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Redirect;
use tower_cookies::Cookies;

use super::session::set_session_cookie;
use crate::error::AuthError;
use crate::provider::{CallbackParams, IdentityProvider};
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// GET /auth/provider
///
/// Starts the handshake by redirecting the browser to the provider's
/// authorization endpoint.
pub async fn begin_login<P, U, S>(State(state): State<Arc<AppState<P, U, S>>>) -> Redirect
where
    P: IdentityProvider,
    U: UserStore,
    S: SessionStore,
{
    let instruction = state.provider.begin_handshake();
    Redirect::to(&instruction.url)
}

/// GET /auth/provider/callback
///
/// Completes the handshake. Any handshake failure redirects back to
/// the login page with no detail (via `AuthError`'s response
/// mapping). A user-store failure is logged and the login still
/// completes; only the durable record is lost for that attempt.
pub async fn callback<P, U, S>(
    State(state): State<Arc<AppState<P, U, S>>>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AuthError>
where
    P: IdentityProvider,
    U: UserStore,
    S: SessionStore,
{
    let profile = state.provider.complete_handshake(params).await?;

    if let Err(e) = state
        .user_store
        .upsert_user(&profile.email, &profile.display_name)
    {
        tracing::warn!(error = %e, email = %profile.email, "User record not persisted");
    }

    let session = state.session_store.create(profile)?;
    set_session_cookie(&cookies, &state.cookie_key, &session.id.0);

    tracing::info!(email = %session.profile.email, "Login complete");
    Ok(Redirect::to("/"))
}
