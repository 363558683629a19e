//! Login, logout and session state.
//!
//! State moves from `Anonymous` to `Authenticated` only through a successful
//! [`AuthService::login`] and back only through [`AuthService::logout`]. A
//! 401 from any other request leaves the session untouched.

use crate::error::{CoreError, Result};
use core_auth::{AuthState, Session, SessionStore, UserProfile};
use core_gateway::HttpGateway;
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

pub const LOGIN_PATH: &str = "/auth/login";

const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

#[derive(Clone, Debug)]
pub struct AuthService {
    gateway: HttpGateway,
    sessions: SessionStore,
    events: EventBus,
}

impl AuthService {
    pub fn new(gateway: HttpGateway, sessions: SessionStore, events: EventBus) -> Self {
        Self {
            gateway,
            sessions,
            events,
        }
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// # Errors
    ///
    /// [`CoreError::LoginFailed`] when the server rejects the credentials,
    /// cannot be reached, or answers without an `access_token`. Any
    /// existing session is left as it was.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "email": email, "password": password });

        let response = match self.gateway.post(LOGIN_PATH, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login rejected");
                let message = e
                    .body()
                    .and_then(|body| body.message())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                return Err(CoreError::LoginFailed { message });
            }
        };

        let login: LoginResponse = serde_json::from_value(response).map_err(|e| {
            warn!(error = %e, "Login response has an unexpected shape");
            CoreError::LoginFailed {
                message: LOGIN_FAILED.to_string(),
            }
        })?;

        let Some(token) = login.access_token.filter(|token| !token.is_empty()) else {
            warn!("Login response carried no access token");
            return Err(CoreError::LoginFailed {
                message: LOGIN_FAILED.to_string(),
            });
        };

        let session = Session::new(token, login.user);
        self.sessions.set(&session).await?;

        let email = session
            .user
            .as_ref()
            .and_then(|user| user.email.clone());
        info!("Signed in");
        self.events
            .emit(CoreEvent::Session(SessionEvent::SignedIn { email }));

        Ok(session)
    }

    /// Clear the persisted session.
    pub async fn logout(&self) -> Result<()> {
        self.sessions.logout().await?;
        info!("Signed out");
        self.events.emit(CoreEvent::Session(SessionEvent::SignedOut));
        Ok(())
    }

    pub async fn state(&self) -> Result<AuthState> {
        Ok(self.sessions.state().await?)
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.sessions.is_logged_in().await?)
    }

    /// Profile of the signed-in user, when the login response carried one.
    pub async fn current_user(&self) -> Result<Option<UserProfile>> {
        Ok(self.sessions.get().await?.and_then(|session| session.user))
    }
}
