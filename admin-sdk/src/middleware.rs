//! Session policy applied around every transport call.
//!
//! `before` attaches the bearer credential, `after` turns a 401 from a
//! protected endpoint into a session reset plus a login redirect. Both hooks
//! are plain functions of the request/response so they can be exercised
//! without a network.

use std::sync::Arc;

use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    StatusCode,
};

use crate::{session::SessionStore, traits::Navigator, transport::ApiRequest};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const GOOGLE_CALLBACK_PATH: &str = "/api/auth/google/callback";

/// Endpoints whose 401 means "bad credentials", not "session expired".
pub const UNAUTHENTICATED_PATHS: [&str; 2] = [LOGIN_PATH, GOOGLE_CALLBACK_PATH];

/// What the response hook decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseVerdict {
    /// Hand the response to the caller unchanged.
    Pass,
    /// The session was cleared and the login redirect issued.
    SessionInvalidated,
}

pub struct SessionMiddleware {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_location: String,
}

impl SessionMiddleware {
    pub fn new(
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        login_location: impl Into<String>,
    ) -> Self {
        Self {
            session,
            navigator,
            login_location: login_location.into(),
        }
    }

    /// Sets `Authorization: Bearer <token>` from the session store, or
    /// strips the header when no token is held.
    pub fn before(&self, request: &mut ApiRequest) {
        request.headers.remove(AUTHORIZATION);

        let Some(token) = self.session.get() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(e) => {
                tracing::warn!("Stored token is not a valid header value, sending without it: {}", e);
            }
        }
    }

    /// Inspects the status of the answer to a request made against `path`.
    pub fn after(&self, path: &str, status: StatusCode) -> ResponseVerdict {
        if status != StatusCode::UNAUTHORIZED || is_unauthenticated_endpoint(path) {
            return ResponseVerdict::Pass;
        }

        tracing::warn!("Protected endpoint {} rejected the session, signing out", path);
        self.session.clear();
        self.navigator.navigate(&self.login_location, path);
        ResponseVerdict::SessionInvalidated
    }

    pub fn login_location(&self) -> &str {
        &self.login_location
    }
}

pub fn is_unauthenticated_endpoint(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    UNAUTHENTICATED_PATHS.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Persistence;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<(String, String)>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, location: &str, trigger_path: &str) {
            self.visits
                .lock()
                .unwrap()
                .push((location.to_string(), trigger_path.to_string()));
        }
    }

    fn middleware() -> (SessionMiddleware, SessionStore, Arc<RecordingNavigator>) {
        let session = SessionStore::in_memory();
        let navigator = Arc::new(RecordingNavigator::default());
        let middleware = SessionMiddleware::new(session.clone(), navigator.clone(), "/login");
        (middleware, session, navigator)
    }

    #[test]
    fn attaches_current_token() {
        let (middleware, session, _) = middleware();
        session.set("abc.def", Persistence::Ephemeral);

        let mut request = ApiRequest::get("/admin/stats");
        middleware.before(&mut request);
        assert_eq!(request.headers[AUTHORIZATION], "Bearer abc.def");
    }

    #[test]
    fn no_token_means_no_header() {
        let (middleware, _, _) = middleware();
        let mut request = ApiRequest::get("/admin/stats");
        request
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        middleware.before(&mut request);
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn unauthorized_on_protected_path_signs_out_once() {
        let (middleware, session, navigator) = middleware();
        session.set("abc", Persistence::Persistent);

        let verdict = middleware.after("/admin/products", StatusCode::UNAUTHORIZED);
        assert_eq!(verdict, ResponseVerdict::SessionInvalidated);
        assert!(!session.is_authenticated());
        assert_eq!(
            *navigator.visits.lock().unwrap(),
            vec![("/login".to_string(), "/admin/products".to_string())]
        );
    }

    #[test]
    fn unauthorized_on_auth_endpoints_is_left_alone() {
        let (middleware, session, navigator) = middleware();
        session.set("abc", Persistence::Persistent);

        for path in [LOGIN_PATH, GOOGLE_CALLBACK_PATH, "/api/auth/login/"] {
            assert_eq!(
                middleware.after(path, StatusCode::UNAUTHORIZED),
                ResponseVerdict::Pass
            );
        }
        assert!(session.is_authenticated());
        assert!(navigator.visits.lock().unwrap().is_empty());
    }

    #[test]
    fn other_statuses_pass_through() {
        let (middleware, session, navigator) = middleware();
        session.set("abc", Persistence::Persistent);

        for status in [StatusCode::OK, StatusCode::FORBIDDEN, StatusCode::INTERNAL_SERVER_ERROR] {
            assert_eq!(middleware.after("/admin/stats", status), ResponseVerdict::Pass);
        }
        assert!(session.is_authenticated());
        assert!(navigator.visits.lock().unwrap().is_empty());
    }

    #[test]
    fn verify_is_a_protected_endpoint() {
        assert!(!is_unauthenticated_endpoint("/api/auth/verify"));
        assert!(!is_unauthenticated_endpoint("/api/auth/google/url"));
        assert!(is_unauthenticated_endpoint("/api/auth/google/callback?code=x"));
    }
}
