//! Login session state
//!
//! A [`Session`] holds the API key (fixed at startup) and the cookie obtained
//! by the `login` tool. The cookie is the only mutable state in the server:
//! it starts absent, is replaced by each successful login and is never
//! cleared. Every dispatcher owns its own session.

use std::sync::RwLock;

use serde_json::Value;

/// Upstream fields that may carry the session cookie, in lookup order
const COOKIE_FIELDS: &[&str] = &["login_cookie", "login_cookies", "cookie"];

/// Whether a login has succeeded yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Default)]
pub struct Session {
    api_key: String,
    // Only locked synchronously; never held across an await.
    cookie: RwLock<Option<String>>,
}

impl Session {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cookie: RwLock::new(None),
        }
    }

    /// API key to send, or `None` when none is configured.
    pub fn api_key(&self) -> Option<String> {
        let key = self.api_key.trim();
        (!key.is_empty()).then(|| key.to_string())
    }

    /// Current session cookie.
    pub fn cookie(&self) -> Option<String> {
        match self.cookie.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Store a new cookie, replacing any previous one.
    pub fn set_cookie(&self, cookie: impl Into<String>) {
        let cookie = cookie.into();
        match self.cookie.write() {
            Ok(mut guard) => *guard = Some(cookie),
            Err(poisoned) => *poisoned.into_inner() = Some(cookie),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookie().is_some()
    }
}

/// Find the session cookie in a login response.
///
/// The response shape is not fixed, so each candidate field is checked at the
/// top level and then under `data`. The first non-empty string wins.
pub fn extract_cookie(response: &Value) -> Option<String> {
    let scopes = [Some(response), response.get("data")];

    scopes
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|object| COOKIE_FIELDS.iter().filter_map(move |f| object.get(*f)))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|cookie| !cookie.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_session_is_unauthenticated() {
        let session = Session::new("key");
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.cookie().is_none());
        assert_eq!(session.api_key().as_deref(), Some("key"));
    }

    #[test]
    fn blank_api_key_is_absent() {
        assert!(Session::new("").api_key().is_none());
        assert!(Session::new("  ").api_key().is_none());
    }

    #[test]
    fn login_overwrites_cookie() {
        let session = Session::new("key");
        session.set_cookie("first");
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.cookie().as_deref(), Some("first"));

        session.set_cookie("second");
        assert_eq!(session.cookie().as_deref(), Some("second"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn sessions_do_not_share_state() {
        let a = Session::new("key");
        let b = Session::new("key");
        a.set_cookie("only-a");
        assert!(a.is_authenticated());
        assert!(!b.is_authenticated());
    }

    #[test]
    fn extract_cookie_top_level() {
        assert_eq!(
            extract_cookie(&json!({"status": "success", "login_cookie": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_cookie(&json!({"login_cookies": "plural"})).as_deref(),
            Some("plural")
        );
    }

    #[test]
    fn extract_cookie_nested_under_data() {
        assert_eq!(
            extract_cookie(&json!({"data": {"cookie": "nested"}})).as_deref(),
            Some("nested")
        );
    }

    #[test]
    fn extract_cookie_skips_missing_and_malformed_fields() {
        assert_eq!(extract_cookie(&json!({"status": "error", "msg": "bad password"})), None);
        assert_eq!(extract_cookie(&json!({"login_cookie": ""})), None);
        assert_eq!(extract_cookie(&json!({"login_cookie": 42})), None);
        assert_eq!(extract_cookie(&json!({"data": "not an object"})), None);
        assert_eq!(extract_cookie(&json!(["login_cookie"])), None);
        assert_eq!(extract_cookie(&Value::Null), None);
        assert_eq!(
            extract_cookie(&json!({"login_cookie": "  ", "data": {"login_cookie": "inner"}}))
                .as_deref(),
            Some("inner")
        );
    }
}
