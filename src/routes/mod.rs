//! HTTP routes for the portal

mod auth;
mod pages;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::provider::IdentityProvider;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// Create the router with all routes
pub fn create_router<P, U, S>(state: Arc<AppState<P, U, S>>) -> Router
where
    P: IdentityProvider + 'static,
    U: UserStore + 'static,
    S: SessionStore + 'static,
{
    create_router_with_static_path(state, "static")
}

/// Create the router with a custom static page directory
pub fn create_router_with_static_path<P, U, S>(
    state: Arc<AppState<P, U, S>>,
    static_path: &str,
) -> Router
where
    P: IdentityProvider + 'static,
    U: UserStore + 'static,
    S: SessionStore + 'static,
{
    let static_dir = Path::new(static_path);

    Router::new()
        .route("/", get(pages::home))
        .route("/auth/provider", get(auth::begin_login))
        .route("/auth/provider/callback", get(auth::callback))
        .route("/logout", get(pages::logout))
        // Login and dashboard pages are served verbatim
        .route_service("/login", ServeFile::new(static_dir.join("login.html")))
        .route_service("/dashboard", ServeFile::new(static_dir.join("dashboard.html")))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
