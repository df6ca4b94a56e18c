//! Home and logout handlers

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use tower_cookies::Cookies;

use super::session::{clear_session_cookie, session_from_cookies};
use crate::provider::IdentityProvider;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// GET /
///
/// Authenticated browsers land on the dashboard with the subject's
/// name and email attached as query parameters (the dashboard page
/// reads them from the URL); everyone else goes to the login page.
pub async fn home<P, U, S>(
    State(state): State<Arc<AppState<P, U, S>>>,
    cookies: Cookies,
) -> Redirect
where
    P: IdentityProvider,
    U: UserStore,
    S: SessionStore,
{
    match session_from_cookies(&cookies, &state.cookie_key, &state.session_store) {
        Some(session) => {
            let query: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("name", &session.profile.display_name)
                .append_pair("email", &session.profile.email)
                .finish();
            Redirect::to(&format!("/dashboard?{query}"))
        }
        None => Redirect::to("/login"),
    }
}

/// GET /logout
///
/// Destroys the session and clears the cookie. Always redirects to
/// the login page, even when no session existed or teardown failed.
pub async fn logout<P, U, S>(
    State(state): State<Arc<AppState<P, U, S>>>,
    cookies: Cookies,
) -> Redirect
where
    P: IdentityProvider,
    U: UserStore,
    S: SessionStore,
{
    if let Some(session) = session_from_cookies(&cookies, &state.cookie_key, &state.session_store)
    {
        if let Err(e) = state.session_store.delete(&session.id) {
            tracing::error!(error = %e, "Session teardown failed");
        }
    }

    clear_session_cookie(&cookies);
    Redirect::to("/login")
}
