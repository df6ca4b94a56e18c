//! Portal configuration

use anyhow::{bail, Context, Result};
use url::Url;

/// Default callback address, must match what the provider console has
/// registered for the client.
const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/auth/provider/callback";

/// Session cookies are signed; the key derivation requires at least
/// this many bytes of secret.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Secret used to sign the session cookie
    pub session_secret: String,

    /// OAuth client identifier issued by the provider
    pub client_id: String,

    /// OAuth client secret issued by the provider
    pub client_secret: String,

    /// Fixed callback address the provider redirects back to
    pub callback_url: Url,

    /// SQLite database path; `None` keeps the user directory in memory
    pub database_path: Option<String>,

    /// Directory holding the static login and dashboard pages
    pub static_dir: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails when the session secret or the provider credentials are
    /// absent; the portal cannot run usefully without them.
    pub fn from_env() -> Result<Self> {
        let session_secret =
            std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }

        let client_id =
            std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID must be set")?;
        let client_secret =
            std::env::var("GOOGLE_CLIENT_SECRET").context("GOOGLE_CLIENT_SECRET must be set")?;

        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a number")?,
            Err(_) => 3000,
        };

        let callback_url = std::env::var("OAUTH_CALLBACK_URL")
            .unwrap_or_else(|_| DEFAULT_CALLBACK_URL.to_string())
            .parse()
            .context("OAUTH_CALLBACK_URL must be a valid URL")?;

        Ok(Self {
            port,
            session_secret,
            client_id,
            client_secret,
            callback_url,
            database_path: std::env::var("DATABASE_PATH").ok(),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        })
    }
}
