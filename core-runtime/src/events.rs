//! # Event Bus System
//!
//! Typed event broadcasting for the admin core, built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event Types**: `SessionEvent`, `Notification`, `ResourceEvent`
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Receiver wrapper with optional filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  notification ┌───────────┐
//! │ HttpGateway ├──────────────>│           │
//! └─────────────┘               │           │     subscribe    ┌────────────┐
//!                               │ EventBus  ├─────────────────>│ UI toasts  │
//! ┌─────────────┐  resource     │ (broadcast│                  └────────────┘
//! │  Resources  ├──────────────>│  channel) │     subscribe    ┌────────────┐
//! └─────────────┘               │           ├─────────────────>│ Table views│
//! ┌─────────────┐  session      │           │                  └────────────┘
//! │ AdminConsole├──────────────>│           │
//! └─────────────┘               └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, Notification, NotificationKind};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus.emit(CoreEvent::Notification(Notification::new(
//!     NotificationKind::NotFound,
//!     "No data found.",
//! )));
//!
//! let event = stream.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Notification(_)));
//! # }
//! ```
//!
//! ## Delivery
//!
//! Emitting with no subscribers is not an error: the event is dropped. A
//! subscriber that falls more than the buffer size behind receives
//! `RecvError::Lagged(n)` and may keep receiving.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Login and logout transitions
    Session(SessionEvent),
    /// User-facing failure notifications raised by the gateway
    Notification(Notification),
    /// Successful mutations against a registered resource
    Resource(ResourceEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Session(e) => e.description(),
            CoreEvent::Notification(n) => &n.message,
            CoreEvent::Resource(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Notification(n) => n.kind.severity(),
            CoreEvent::Session(_) => EventSeverity::Info,
            CoreEvent::Resource(_) => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Session Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A login succeeded and the session was persisted.
    SignedIn {
        /// Email of the signed-in user, when the server returned one.
        email: Option<String>,
    },
    /// The session was explicitly cleared.
    SignedOut,
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::SignedIn { .. } => "User signed in",
            SessionEvent::SignedOut => "User signed out",
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Failure classes that produce a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    AuthenticationRequired,
    AuthorizationDenied,
    NotFound,
    ServerFault,
    Connectivity,
}

impl NotificationKind {
    pub fn severity(&self) -> EventSeverity {
        match self {
            NotificationKind::NotFound => EventSeverity::Warning,
            NotificationKind::AuthenticationRequired | NotificationKind::AuthorizationDenied => {
                EventSeverity::Warning
            }
            NotificationKind::ServerFault | NotificationKind::Connectivity => EventSeverity::Error,
        }
    }
}

/// A single user-facing message, emitted once per classified failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// ============================================================================
// Resource Events
// ============================================================================

/// Mutations that completed successfully against the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ResourceEvent {
    Created {
        entity: String,
    },
    Updated {
        entity: String,
        id: String,
    },
    Removed {
        entity: String,
        id: String,
    },
    Toggled {
        entity: String,
        id: String,
    },
    StatusChanged {
        entity: String,
        id: String,
        status: String,
    },
}

impl ResourceEvent {
    /// Name of the entity the event refers to.
    pub fn entity(&self) -> &str {
        match self {
            ResourceEvent::Created { entity }
            | ResourceEvent::Updated { entity, .. }
            | ResourceEvent::Removed { entity, .. }
            | ResourceEvent::Toggled { entity, .. }
            | ResourceEvent::StatusChanged { entity, .. } => entity,
        }
    }

    fn description(&self) -> &str {
        match self {
            ResourceEvent::Created { .. } => "Resource created",
            ResourceEvent::Updated { .. } => "Resource updated",
            ResourceEvent::Removed { .. } => "Resource removed",
            ResourceEvent::Toggled { .. } => "Resource toggled",
            ResourceEvent::StatusChanged { .. } => "Resource status changed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for broadcasting events to multiple subscribers.
///
/// Cloning is cheap; clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `AdminConfig` rejects a zero buffer
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received the event; zero when
    /// nobody is listening.
    pub fn emit(&self, event: CoreEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribes and wraps the receiver in an [`EventStream`].
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Receiver wrapper that skips events not matching an optional predicate.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    ///
    /// ```rust
    /// use core_runtime::events::{CoreEvent, EventBus};
    ///
    /// let bus = EventBus::new(16);
    /// let notifications = bus
    ///     .stream()
    ///     .filter(|event| matches!(event, CoreEvent::Notification(_)));
    /// ```
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking receive. `None` when nothing matching is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every queued matching event without waiting.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
