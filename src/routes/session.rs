//! Session cookie helpers
//!
//! The browser holds an HTTP-only, signed cookie carrying the session
//! id; the session itself lives server-side. A missing, garbage, or
//! tampered cookie reads as anonymous.

use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies, Key};

use crate::store::{Session, SessionId, SessionStore};

pub const SESSION_COOKIE: &str = "portal_session";

/// Resolve the current session from the request cookies, if any
pub fn session_from_cookies<S: SessionStore>(
    cookies: &Cookies,
    key: &Key,
    session_store: &S,
) -> Option<Session> {
    cookies.signed(key).get(SESSION_COOKIE).and_then(|c| {
        let session_id = SessionId(c.value().to_string());
        session_store.get(&session_id).ok().flatten()
    })
}

/// Set the signed session cookie
pub fn set_session_cookie(cookies: &Cookies, key: &Key, session_id: &str) {
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookies.signed(key).add(cookie);
}

/// Instruct the client to clear the session cookie
pub fn clear_session_cookie(cookies: &Cookies) {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .build();
    cookies.add(cookie);
}
