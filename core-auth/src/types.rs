use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Credential carried by a persisted session.
///
/// Older consoles stored the token directly; some backends return it wrapped
/// one level deep as `{ "token": "..." }`. Both shapes deserialize here.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionToken {
    Plain(String),
    Wrapped {
        #[serde(default)]
        token: Option<Value>,
    },
    /// Any other shape; carries no usable token.
    Other(Value),
}

impl SessionToken {
    /// Usable bearer string after at most one unwrap.
    ///
    /// An empty plain string or a wrapper whose inner value is missing, empty
    /// or not a string resolves to `None`.
    pub fn resolve(&self) -> Option<&str> {
        let candidate = match self {
            SessionToken::Plain(token) => Some(token.as_str()),
            SessionToken::Wrapped { token } => token.as_ref().and_then(Value::as_str),
            SessionToken::Other(_) => None,
        };
        candidate.filter(|token| !token.is_empty())
    }

    /// Whether the session token is an empty plain string.
    ///
    /// Such sessions defer to the legacy token key, like a missing session.
    pub fn is_blank(&self) -> bool {
        matches!(self, SessionToken::Plain(token) if token.is_empty())
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        SessionToken::Plain(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        SessionToken::Plain(token.to_string())
    }
}

// Never print credentials.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionToken::Plain(_) => f.write_str("Plain([REDACTED])"),
            SessionToken::Wrapped { .. } => f.write_str("Wrapped([REDACTED])"),
            SessionToken::Other(_) => f.write_str("Other([REDACTED])"),
        }
    }
}

/// Profile of the signed-in administrator as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Any other fields the backend sent, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted authentication bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(token: impl Into<SessionToken>, user: Option<UserProfile>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.resolve()
    }
}

/// Authentication state of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

impl AuthState {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(_) => AuthState::Authenticated,
            None => AuthState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_token_resolves() {
        let session: Session = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert_eq!(session.token(), Some("abc"));
        assert!(session.user.is_none());
    }

    #[test]
    fn test_wrapped_token_resolves_once() {
        let session: Session =
            serde_json::from_value(json!({"token": {"token": "abc"}})).unwrap();
        assert_eq!(session.token(), Some("abc"));

        let nested: Session =
            serde_json::from_value(json!({"token": {"token": {"token": "abc"}}})).unwrap();
        assert_eq!(nested.token(), None);
    }

    #[test]
    fn test_wrapped_without_inner_token() {
        let session: Session = serde_json::from_value(json!({"token": {}})).unwrap();
        assert_eq!(session.token(), None);
        assert!(!session.token.is_blank());
    }

    #[test]
    fn test_unexpected_token_shape_resolves_to_none() {
        for raw in [json!({"token": 123}), json!({"token": null}), json!({"token": [1, 2]})] {
            let session: Session = serde_json::from_value(raw).unwrap();
            assert_eq!(session.token(), None);
            assert!(!session.token.is_blank());
        }
    }

    #[test]
    fn test_empty_plain_token_is_blank() {
        let token = SessionToken::from("");
        assert_eq!(token.resolve(), None);
        assert!(token.is_blank());
    }

    #[test]
    fn test_user_profile_keeps_extra_fields() {
        let session: Session = serde_json::from_value(json!({
            "token": "abc",
            "user": {"id": 1, "email": "admin@shop.test", "role": "admin", "avatar": "a.png"}
        }))
        .unwrap();
        let user = session.user.unwrap();
        assert_eq!(user.email.as_deref(), Some("admin@shop.test"));
        assert_eq!(user.extra.get("avatar"), Some(&json!("a.png")));
    }

    #[test]
    fn test_serialized_shape() {
        let session = Session::new("abc", None);
        assert_eq!(serde_json::to_value(&session).unwrap(), json!({"token": "abc"}));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("super-secret", None);
        assert!(!format!("{:?}", session).contains("super-secret"));
    }

    #[test]
    fn test_auth_state_from_token() {
        assert_eq!(AuthState::from_token(Some("t")), AuthState::Authenticated);
        assert_eq!(AuthState::from_token(None), AuthState::Anonymous);
        assert!(!AuthState::default().is_authenticated());
    }
}
