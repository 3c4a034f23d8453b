use std::collections::HashMap;
use std::sync::Mutex;

use rand::Rng;

pub const SESSION_COOKIE: &str = "wayfare_session";

const SESSION_ID_BYTES: usize = 32;

/// In-process session registry mapping opaque session ids to user ids.
/// Owned by `AppState` and handed to the components that need it; there
/// is no ambient global session table.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, i64>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for a user and returns the new session id.
    pub fn create(&self, user_id: i64) -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rand::thread_rng().fill(&mut bytes);
        let id = hex::encode(bytes);

        self.lock().insert(id.clone(), user_id);
        id
    }

    pub fn get(&self, session_id: &str) -> Option<i64> {
        self.lock().get(session_id).copied()
    }

    /// Invalidates a session. A subsequent `get` on the same id returns
    /// None. Returns false when the id was not live.
    pub fn destroy(&self, session_id: &str) -> bool {
        self.lock().remove(session_id).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
