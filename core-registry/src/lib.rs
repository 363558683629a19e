//! # Entity Registry
//!
//! Declarative description of every resource the admin console manages.
//!
//! ## Overview
//!
//! - [`FieldSpec`] / [`FieldKind`]: typed field declarations
//! - [`EntityDescriptor`]: fields plus bound [`EntityOperations`]
//! - [`EntityRegistry`]: validated, ordered lookup by name
//! - [`ResourceClient`]: typed CRUD over a descriptor
//! - [`catalog`]: the storefront's six entities
//!
//! ## Example
//!
//! ```no_run
//! use core_registry::catalog::{self, BRANDS};
//! use serde_json::Value;
//! # use std::error::Error;
//! # async fn example(gateway: core_gateway::HttpGateway) -> Result<(), Box<dyn Error>> {
//! let registry = catalog::storefront_registry(&gateway)?;
//! let brands = registry.client::<Value>(BRANDS)?;
//!
//! for brand in brands.list().await? {
//!     println!("{}", brand["name"]);
//! }
//! brands.toggle(3).await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod id;
pub mod operations;
pub mod registry;

pub use client::ResourceClient;
pub use descriptor::{DescriptorBuilder, EntityDescriptor};
pub use error::{RegistryError, Result};
pub use field::{FieldKind, FieldSpec};
pub use id::EntityId;
pub use operations::{Bindings, EntityOperations, RestOperations};
pub use registry::EntityRegistry;
