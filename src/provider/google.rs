//! Google implementation of the identity provider handshake

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{CallbackParams, HandshakeStates, IdentityProvider, RedirectInstruction};
use crate::error::AuthError;
use crate::store::Profile;

/// Timeout applied to the token exchange and profile fetch. The
/// source relied on transport defaults; a hung provider would have
/// hung the login.
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Provider endpoint and credential configuration.
///
/// Required fields are constructor parameters; endpoint URLs default
/// to Google's and can be overridden for testing.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: Url,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) userinfo_url: Url,
    pub(crate) scopes: Vec<String>,
}

impl ProviderConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth"
                .parse()
                .expect("valid default URL"),
            token_url: "https://oauth2.googleapis.com/token"
                .parse()
                .expect("valid default URL"),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["openid".into(), "profile".into(), "email".into()],
        }
    }

    /// Override the authorization endpoint
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the token exchange endpoint
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the userinfo endpoint
    #[must_use]
    pub fn with_userinfo_url(mut self, url: Url) -> Self {
        self.userinfo_url = url;
        self
    }
}

/// Token response from the provider's token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Userinfo claims we care about
#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

/// Authorization-code client for Google sign-in
pub struct GoogleProvider {
    config: ProviderConfig,
    http: reqwest::Client,
    states: HandshakeStates,
}

impl GoogleProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("reqwest client");
        Self {
            config,
            http,
            states: HandshakeStates::new(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("token exchange: {e}")))?;

        let response = Self::ensure_success(response, "token exchange").await?;
        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Provider(format!("token exchange: {e}")))
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("profile fetch: {e}")))?;

        let response = Self::ensure_success(response, "profile fetch").await?;
        response
            .json::<UserInfo>()
            .await
            .map_err(|e| AuthError::Provider(format!("profile fetch: {e}")))
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, AuthError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::Provider(format!(
            "{operation} returned {status}: {body}"
        )))
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn begin_handshake(&self) -> RedirectInstruction {
        let state = self.states.issue();
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &scope)
            .append_pair("state", &state);

        RedirectInstruction { url: url.into() }
    }

    async fn complete_handshake(&self, params: CallbackParams) -> Result<Profile, AuthError> {
        // Anti-forgery first: the state must match what we issued
        let state = params.state.ok_or(AuthError::InvalidState)?;
        self.states.consume(&state)?;

        if let Some(denial) = params.error {
            return Err(AuthError::Provider(format!("provider denied: {denial}")));
        }
        let code = params
            .code
            .ok_or_else(|| AuthError::Provider("callback carried no code".to_string()))?;

        let token = self.exchange_code(&code).await?;
        let info = self.fetch_userinfo(&token.access_token).await?;

        if info.email_verified == Some(false) {
            return Err(AuthError::MalformedProfile);
        }
        let email = match info.email {
            Some(email) if !email.is_empty() => email,
            _ => return Err(AuthError::MalformedProfile),
        };
        let display_name = info.name.unwrap_or_else(|| email.clone());

        Ok(Profile {
            email,
            display_name,
            provider_user_id: info.sub,
        })
    }
}
