use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::storage::{CookieStorage, MemoryCookieJar, StoredCookie};

/// Cookie name the token is stored under.
pub const TOKEN_COOKIE: &str = "authToken";

/// Lifetime of a remembered login.
pub const PERSISTENT_TTL_DAYS: i64 = 7;

/// How long a stored token should survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    /// Cleared at the end of the browsing session.
    #[default]
    Ephemeral,
    /// Kept for [`PERSISTENT_TTL_DAYS`] days.
    Persistent,
}

impl Persistence {
    pub fn remember(remember_me: bool) -> Self {
        if remember_me {
            Persistence::Persistent
        } else {
            Persistence::Ephemeral
        }
    }
}

/// Holds the operator's bearer token.
///
/// Constructed once at startup and shared by `Arc` with the HTTP client and
/// the facades. At most one token exists at a time; `set` replaces it.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn CookieStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn CookieStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by a process-local cookie jar.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCookieJar::new()))
    }

    pub fn set(&self, token: &str, persistence: Persistence) {
        let cookie = match persistence {
            Persistence::Ephemeral => StoredCookie::session(token),
            Persistence::Persistent => {
                StoredCookie::expiring(token, Utc::now() + Duration::days(PERSISTENT_TTL_DAYS))
            }
        };

        if let Err(e) = self.storage.set(TOKEN_COOKIE, cookie) {
            tracing::error!("Failed to store session token: {}", e);
            return;
        }
        tracing::debug!("Session token stored ({:?})", persistence);
    }

    pub fn get(&self) -> Option<String> {
        match self.storage.get(TOKEN_COOKIE) {
            Ok(cookie) => cookie.map(|c| c.value).filter(|token| !token.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(TOKEN_COOKIE) {
            tracing::error!("Failed to remove session token: {}", e);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
