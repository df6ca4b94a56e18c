//! OAuth Login Portal
//!
//! A small HTTP server that delegates user login to a third-party
//! identity provider via the authorization-code handshake, records
//! authenticated users in a relational store, and tracks a
//! cookie-backed server-side session.

pub mod config;
pub mod error;
pub mod provider;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AuthError;
pub use provider::{
    CallbackParams, GoogleProvider, HandshakeStates, IdentityProvider, ProviderConfig,
    RedirectInstruction,
};
pub use state::AppState;
pub use store::{
    InMemorySessionStore, InMemoryUserStore, Profile, Session, SessionId, SessionStore,
    SqliteStore, UserRecord, UserStore,
};
