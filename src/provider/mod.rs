//! Identity provider handshake
//!
//! A single-capability interface for the authorization-code redirect
//! flow: build the outbound redirect, then turn the inbound callback
//! into a verified profile. One concrete implementation exists for
//! the one real provider; tests substitute their own.

pub mod google;

pub use google::{GoogleProvider, ProviderConfig};

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Deserialize;

use crate::error::AuthError;
use crate::store::Profile;

/// How long an issued state value stays valid. The handshake is a
/// single browser redirect round trip, so this is generous.
const STATE_TTL_MINUTES: i64 = 10;

/// Instruction to redirect the browser to the provider's
/// authorization endpoint.
#[derive(Debug, Clone)]
pub struct RedirectInstruction {
    pub url: String,
}

/// Query parameters the provider sends to the callback endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the provider reports a denial (e.g. `access_denied`)
    pub error: Option<String>,
}

/// The authorization-code handshake with the external provider.
///
/// Neither operation touches the user store; persistence is the
/// caller's concern.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Construct the redirect to the provider's authorization
    /// endpoint, registering a fresh single-use state value.
    fn begin_handshake(&self) -> RedirectInstruction;

    /// Validate the callback, exchange the code for an access token,
    /// fetch the profile, and extract email + display name.
    async fn complete_handshake(&self, params: CallbackParams) -> Result<Profile, AuthError>;
}

/// Registry of outstanding handshake state values.
///
/// Each value correlates one outbound redirect with its inbound
/// callback; consuming a value removes it, so replay fails.
#[derive(Default)]
pub struct HandshakeStates {
    pending: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl HandshakeStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and register a fresh state value (16 random bytes,
    /// base64url).
    pub fn issue(&self) -> String {
        let random_bytes: [u8; 16] = rand::thread_rng().gen();
        let state = URL_SAFE_NO_PAD.encode(random_bytes);

        let cutoff = Utc::now() - Duration::minutes(STATE_TTL_MINUTES);
        let mut pending = self.pending.write().unwrap();
        // Expired entries from abandoned handshakes pile up otherwise
        pending.retain(|_, issued_at| *issued_at > cutoff);
        pending.insert(state.clone(), Utc::now());

        state
    }

    /// Consume a state value. Fails if it was never issued, already
    /// consumed, or issued too long ago.
    pub fn consume(&self, state: &str) -> Result<(), AuthError> {
        let mut pending = self.pending.write().unwrap();
        match pending.remove(state) {
            Some(issued_at)
                if issued_at > Utc::now() - Duration::minutes(STATE_TTL_MINUTES) =>
            {
                Ok(())
            }
            _ => Err(AuthError::InvalidState),
        }
    }

    #[cfg(test)]
    fn issue_at(&self, issued_at: DateTime<Utc>) -> String {
        let random_bytes: [u8; 16] = rand::thread_rng().gen();
        let state = URL_SAFE_NO_PAD.encode(random_bytes);
        self.pending.write().unwrap().insert(state.clone(), issued_at);
        state
    }
}
