//! Session Persistence
//!
//! Stores the administrator session through the host's [`SecureStore`].
//!
//! ## Layout
//!
//! - [`SESSION_KEY`] holds the full session as JSON (`{ token, user }`).
//! - [`LEGACY_TOKEN_KEY`] duplicates the bare token for direct lookup.
//!
//! Both keys are cleared together on logout.
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{Session, SessionStore};
//! use std::sync::Arc;
//! # use bridge_traits::storage::SecureStore;
//! # async fn example(secure_store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
//! let sessions = SessionStore::new(secure_store);
//!
//! sessions.set(&Session::new("jwt-value", None)).await?;
//! assert!(sessions.is_logged_in().await?);
//!
//! sessions.logout().await?;
//! assert_eq!(sessions.get_token().await?, None);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AuthState, Session};
use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key of the persisted session record.
pub const SESSION_KEY: &str = "kwi_auth";

/// Key of the bare token duplicate.
pub const LEGACY_TOKEN_KEY: &str = "token";

/// Session persistence over a [`SecureStore`].
///
/// Token values are never logged.
#[derive(Clone)]
pub struct SessionStore {
    secure_store: Arc<dyn SecureStore>,
}

impl SessionStore {
    pub fn new(secure_store: Arc<dyn SecureStore>) -> Self {
        debug!("Initializing SessionStore");
        Self { secure_store }
    }

    /// The persisted session, if any.
    ///
    /// A record that cannot be parsed is treated as absent and left in place;
    /// only a storage backend failure is an error.
    pub async fn get(&self) -> Result<Option<Session>> {
        let Some(data) = self.read(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_slice::<Session>(&data) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "Persisted session is unreadable, treating as signed out");
                Ok(None)
            }
        }
    }

    /// Persist `session` and mirror its token under the legacy key.
    ///
    /// When the session carries no resolvable token the legacy key is
    /// removed so it cannot resurrect an older credential.
    pub async fn set(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_vec(session).map_err(|e| AuthError::SerializationFailed {
            context: "session".to_string(),
            source: e,
        })?;

        self.write(SESSION_KEY, &json).await?;

        match session.token() {
            Some(token) => self.write(LEGACY_TOKEN_KEY, token.as_bytes()).await?,
            None => self.remove(LEGACY_TOKEN_KEY).await?,
        }

        info!(
            has_user = session.user.is_some(),
            "Session stored"
        );
        Ok(())
    }

    /// Clear the session record and the legacy token.
    pub async fn logout(&self) -> Result<()> {
        self.remove(SESSION_KEY).await?;
        self.remove(LEGACY_TOKEN_KEY).await?;
        info!("Session cleared");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get_token().await?.is_some())
    }

    pub async fn state(&self) -> Result<AuthState> {
        Ok(AuthState::from_token(self.get_token().await?.as_deref()))
    }

    /// Resolve the bearer token.
    ///
    /// - plain session token: that string
    /// - wrapped session token: its inner `token`, or `None`
    /// - no session (or a blank plain token): the legacy key
    pub async fn get_token(&self) -> Result<Option<String>> {
        match self.get().await? {
            Some(session) if !session.token.is_blank() => {
                Ok(session.token().map(str::to_string))
            }
            _ => self.legacy_token().await,
        }
    }

    async fn legacy_token(&self) -> Result<Option<String>> {
        let Some(data) = self.read(LEGACY_TOKEN_KEY).await? else {
            return Ok(None);
        };

        match String::from_utf8(data) {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) => Ok(None),
            Err(_) => {
                warn!("Legacy token is not valid UTF-8, ignoring");
                Ok(None)
            }
        }
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.secure_store.get_secret(key).await.map_err(|e| {
            warn!(key, error = %e, "Failed to read from secure storage");
            AuthError::SecureStorageUnavailable(e.to_string())
        })
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        self.secure_store.set_secret(key, value).await.map_err(|e| {
            warn!(key, error = %e, "Failed to write to secure storage");
            AuthError::SecureStorageUnavailable(e.to_string())
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.secure_store.delete_secret(key).await.map_err(|e| {
            warn!(key, error = %e, "Failed to delete from secure storage");
            AuthError::SecureStorageUnavailable(e.to_string())
        })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("secure_store", &"SecureStore { ... }")
            .finish()
    }
}
