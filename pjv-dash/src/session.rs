//! Login session tracking
//!
//! One explicit session object per login, holding an `authenticated`
//! flag; logout resets and discards it. No ambient global state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Per-login session state
#[derive(Debug, Clone)]
pub struct Session {
    pub authenticated: bool,
}

/// Shared store of active sessions, keyed by opaque token
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Open a new authenticated session and return its token
    pub fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner
            .lock()
            .expect("session store poisoned")
            .insert(token.clone(), Session { authenticated: true });
        token
    }

    /// Whether the token maps to an authenticated session
    pub fn is_authenticated(&self, token: &str) -> bool {
        self.inner
            .lock()
            .expect("session store poisoned")
            .get(token)
            .map(|s| s.authenticated)
            .unwrap_or(false)
    }

    /// Logout: clear the flag and discard the session
    pub fn close(&self, token: &str) {
        let mut sessions = self.inner.lock().expect("session store poisoned");
        if let Some(session) = sessions.get_mut(token) {
            session.authenticated = false;
        }
        sessions.remove(token);
    }
}
