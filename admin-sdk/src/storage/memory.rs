use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{
    errors::Result,
    storage::{CookieStorage, StoredCookie},
};

#[derive(Debug, Clone)]
pub struct MemoryCookieJar {
    cookies: Arc<DashMap<String, StoredCookie>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Removes `name` only if the stored cookie is still expired at `now`,
    /// so a `set` racing with the read keeps its fresh value.
    fn evict_expired(&self, name: &str, now: DateTime<Utc>) -> bool {
        let evicted = self
            .cookies
            .remove_if(name, |_, cookie| cookie.is_expired_at(now))
            .is_some();
        if evicted {
            tracing::debug!("Cookie {} expired, evicting", name);
        }
        evicted
    }
}

impl CookieStorage for MemoryCookieJar {
    fn set(&self, name: &str, cookie: StoredCookie) -> Result<()> {
        self.cookies.insert(name.to_string(), cookie);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<StoredCookie>> {
        let now = Utc::now();
        if let Some(entry) = self.cookies.get(name) {
            if !entry.is_expired_at(now) {
                return Ok(Some(entry.clone()));
            }
        }

        self.evict_expired(name, now);
        Ok(None)
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.cookies.remove(name);
        Ok(())
    }
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expired_cookie_reads_as_absent_and_is_evicted() {
        let jar = MemoryCookieJar::new();
        jar.set(
            "authToken",
            StoredCookie::expiring("old", Utc::now() - Duration::seconds(1)),
        )
        .unwrap();
        assert_eq!(jar.len(), 1);

        assert_eq!(jar.get("authToken").unwrap(), None);
        assert!(jar.is_empty());
    }

    #[test]
    fn eviction_spares_a_cookie_replaced_after_the_expiry_check() {
        let jar = MemoryCookieJar::new();
        let now = Utc::now();
        jar.set(
            "authToken",
            StoredCookie::expiring("old", now - Duration::seconds(1)),
        )
        .unwrap();

        // A fresh login lands between the expiry check and the eviction.
        jar.set(
            "authToken",
            StoredCookie::expiring("fresh", now + Duration::days(7)),
        )
        .unwrap();
        assert!(!jar.evict_expired("authToken", now));
        assert_eq!(
            jar.get("authToken").unwrap().map(|c| c.value),
            Some("fresh".to_string())
        );

        jar.set(
            "authToken",
            StoredCookie::expiring("stale", now - Duration::seconds(1)),
        )
        .unwrap();
        assert!(jar.evict_expired("authToken", now));
        assert!(jar.is_empty());
    }

    #[test]
    fn session_cookie_never_expires_on_its_own() {
        let jar = MemoryCookieJar::new();
        jar.set("authToken", StoredCookie::session("abc")).unwrap();
        assert_eq!(
            jar.get("authToken").unwrap().map(|c| c.value),
            Some("abc".to_string())
        );
        jar.remove("authToken").unwrap();
        jar.remove("authToken").unwrap();
        assert_eq!(jar.get("authToken").unwrap(), None);
    }
}
