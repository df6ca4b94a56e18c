//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{Profile, Session, SessionId, SessionStore, StoreResult, UserRecord, UserStore};

/// In-memory user store.
///
/// Clones share the same underlying map so tests can hold a handle to
/// the store the server is using.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn upsert_user(&self, email: &str, name: &str) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let mut users = self.users.write().unwrap();
        // Insert-or-ignore: an existing row wins
        users.entry(normalized.clone()).or_insert_with(|| UserRecord {
            email: normalized,
            name: name.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    fn get_user(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let normalized = email.to_lowercase();
        Ok(self.users.read().unwrap().get(&normalized).cloned())
    }
}

/// Default absolute session lifetime
const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// In-memory session store with an absolute expiry applied on read.
///
/// Clones share the same session map.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    max_age: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_age(Duration::hours(DEFAULT_MAX_AGE_HOURS))
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, profile: Profile) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            profile,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        let cutoff = Utc::now() - self.max_age;
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get(session_id) {
            Some(session) if session.created_at > cutoff => Ok(Some(session.clone())),
            Some(_) => {
                // Expired; drop it lazily
                sessions.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        self.sessions.write().unwrap().remove(session_id);
        Ok(())
    }
}
