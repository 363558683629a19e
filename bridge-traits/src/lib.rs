//! # Host Bridge Traits
//!
//! Host abstraction traits for the storefront admin core.
//!
//! ## Overview
//!
//! This crate defines the contract between the admin core and the
//! host-specific implementations it runs on. Each trait represents a
//! capability that the core requires but that a host provides.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport, JSON and multipart bodies
//! - [`SecureStore`](storage::SecureStore) - Session persistence (Keychain, Secret Service, memory)
//! - [`LoggerSink`](logger::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing:
//!
//! ```ignore
//! use core_runtime::error::CoreError;
//!
//! let http_client = config.http_client.ok_or_else(|| CoreError::CapabilityMissing {
//!     capability: "HttpClient".to_string(),
//!     message: "No HTTP client implementation provided. \
//!               Enable the desktop-shims feature or inject an adapter."
//!         .to_string(),
//! })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). A request that
//! never produced a response is reported as [`BridgeError::Transport`] so the
//! gateway can tell connectivity failures apart from HTTP error statuses.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so they can be shared through
//! `Arc<dyn Trait>` across async tasks.

pub mod error;
pub mod http;
pub mod logger;
pub mod multipart;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logger::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use multipart::{FilePart, FormValue, MultipartForm};
pub use storage::SecureStore;
