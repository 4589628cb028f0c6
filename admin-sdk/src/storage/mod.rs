pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use memory::MemoryCookieJar;

/// A named value held by the client-side storage medium.
///
/// `expires_at == None` marks a session cookie: it lives until the end of
/// the browsing session (for a CLI, the end of the process).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    pub fn session(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn expiring(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Storage medium behind the session store. Implementations enforce expiry:
/// an expired cookie must read as absent.
pub trait CookieStorage: Send + Sync {
    fn set(&self, name: &str, cookie: StoredCookie) -> Result<()>;
    fn get(&self, name: &str) -> Result<Option<StoredCookie>>;
    fn remove(&self, name: &str) -> Result<()>;
}
