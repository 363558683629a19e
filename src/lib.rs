//! Workspace umbrella crate.
//!
//! Exposes feature flags that map to the individual workspace crates so a
//! host application can depend on `storefront-admin-workspace` alone and get
//! the admin console with desktop bridges wired in.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
