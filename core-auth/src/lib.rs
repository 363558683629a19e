//! # Authentication Module
//!
//! Session credential handling for the storefront admin console.
//!
//! ## Overview
//!
//! - [`Session`] / [`SessionToken`]: the persisted `{ token, user }` bundle,
//!   accepting plain and one-level wrapped tokens
//! - [`SessionStore`]: persistence through the host `SecureStore`, legacy
//!   bare-token mirroring, token resolution
//! - [`AuthState`]: `Anonymous` or `Authenticated`
//!
//! There is no expiry or refresh logic; a session lives until explicit logout.

pub mod error;
pub mod session_store;
pub mod types;

pub use error::{AuthError, Result};
pub use session_store::{SessionStore, LEGACY_TOKEN_KEY, SESSION_KEY};
pub use types::{AuthState, Session, SessionToken, UserProfile};
