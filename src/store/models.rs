//! Data models for portal storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// A persisted user, keyed by verified email
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Verified identity data received from the provider for one login
/// attempt. Not persisted directly; it seeds the UserRecord and
/// becomes the session subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub display_name: String,
    pub provider_user_id: String,
}

/// A server-side session binding a browser to an authenticated identity
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// The full provider profile is the session subject, mirroring the
    /// source's choice of serializing the whole profile.
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}
