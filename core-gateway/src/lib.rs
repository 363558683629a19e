//! # REST Gateway
//!
//! Outbound channel from the admin console to the storefront backend.
//!
//! ## Overview
//!
//! - [`normalizer`]: `isActive` to `status` rewrite of outgoing bodies,
//!   plus per-resource [`PayloadPolicy`]
//! - [`HttpGateway`]: bearer injection, normalization, failure
//!   classification and the single user-facing notification per failure
//! - [`GatewayError`]: the failure taxonomy, carrying server bodies unchanged
//!
//! ```no_run
//! use core_gateway::HttpGateway;
//! use serde_json::json;
//! # async fn example(gateway: HttpGateway) -> core_gateway::Result<()> {
//! let brands = gateway.get("/brands").await?;
//! let created = gateway
//!     .post("/brands", json!({ "name": "Acme", "isActive": true }))
//!     .await?;
//! # let _ = (brands, created);
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod classify;
pub mod error;
pub mod gateway;
pub mod normalizer;

pub use body::RequestBody;
pub use error::{ErrorBody, GatewayError, Result};
pub use gateway::{ApiRequest, HttpGateway};
pub use normalizer::{is_truthy, normalize, PayloadPolicy, STATUS_ACTIVE, STATUS_INACTIVE};
