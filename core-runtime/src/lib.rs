//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the storefront admin core:
//! - Logging and tracing setup
//! - Configuration (backend URL resolution, bridge injection)
//! - Event bus for notifications, session transitions and resource mutations
//!
//! Every other core crate depends on this one for its event and logging
//! conventions.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{AdminConfig, AdminConfigBuilder};
pub use error::{Error, Result};
pub use events::{
    CoreEvent, EventBus, EventStream, Notification, NotificationKind, ResourceEvent, SessionEvent,
};
