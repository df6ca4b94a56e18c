//! Common test utilities for portal integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use url::Url;

use oauth_portal::routes::session::SESSION_COOKIE;
use oauth_portal::{
    routes, AppState, AuthError, CallbackParams, HandshakeStates, IdentityProvider,
    InMemorySessionStore, InMemoryUserStore, Profile, RedirectInstruction, UserStore,
};

/// Cookie signing secret used by all test servers (32+ bytes)
pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// The profile the mock provider hands back on a successful handshake
pub fn test_profile() -> Profile {
    Profile {
        email: "ada@example.com".to_string(),
        display_name: "Ada Lovelace".to_string(),
        provider_user_id: "mock-sub-1".to_string(),
    }
}

/// Mock identity provider.
///
/// Issues real single-use state values so the anti-forgery path is
/// exercised end to end; the network exchange is replaced by a fixed
/// rule: any code succeeds except `bad-code`.
pub struct MockProvider {
    states: HandshakeStates,
    profile: Profile,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            states: HandshakeStates::new(),
            profile: test_profile(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn begin_handshake(&self) -> RedirectInstruction {
        let state = self.states.issue();
        let mut url: Url = "https://provider.example/authorize".parse().unwrap();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", "mock-client")
            .append_pair("scope", "openid profile email")
            .append_pair("state", &state);
        RedirectInstruction { url: url.into() }
    }

    async fn complete_handshake(&self, params: CallbackParams) -> Result<Profile, AuthError> {
        let state = params.state.ok_or(AuthError::InvalidState)?;
        self.states.consume(&state)?;

        if let Some(denial) = params.error {
            return Err(AuthError::Provider(format!("provider denied: {denial}")));
        }
        match params.code.as_deref() {
            Some("bad-code") => Err(AuthError::Provider("token exchange failed".to_string())),
            Some(_) => Ok(self.profile.clone()),
            None => Err(AuthError::Provider("callback carried no code".to_string())),
        }
    }
}

/// Create a test server backed by shared in-memory stores
pub fn create_test_server() -> (TestServer, InMemoryUserStore, InMemorySessionStore) {
    let user_store = InMemoryUserStore::new();
    let session_store = InMemorySessionStore::new();
    let server = create_test_server_with_user_store(user_store.clone(), session_store.clone());
    (server, user_store, session_store)
}

/// Create a test server with a caller-supplied user store
pub fn create_test_server_with_user_store<U: UserStore + 'static>(
    user_store: U,
    session_store: InMemorySessionStore,
) -> TestServer {
    let state = Arc::new(AppState::new(
        MockProvider::new(),
        user_store,
        session_store,
        TEST_SECRET,
    ));

    let app = routes::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// The Location header of a redirect response
pub fn redirect_target(response: &TestResponse) -> String {
    response
        .headers()
        .get("location")
        .expect("No Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Extract the state value from the provider authorization URL
pub fn state_from_redirect(response: &TestResponse) -> String {
    let url: Url = redirect_target(response).parse().unwrap();
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("No state in authorization URL")
}

/// Run the full handshake and return the session cookie value
pub async fn login(server: &TestServer) -> String {
    let response = server.get("/auth/provider").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let state = state_from_redirect(&response);

    let response = server
        .get("/auth/provider/callback")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;
    assert_eq!(redirect_target(&response), "/");

    response
        .maybe_cookie(SESSION_COOKIE)
        .expect("No session cookie")
        .value()
        .to_string()
}
