//! # Admin Configuration
//!
//! Builder-based configuration for the storefront admin core.
//!
//! ## Overview
//!
//! [`AdminConfig`] holds the resolved backend base URL, the asset base used
//! for media paths, and the host bridges the core depends on. The builder
//! resolves everything once and fails fast with actionable messages.
//!
//! ## Base URL resolution
//!
//! 1. An explicit override (`api_url`, or `STOREFRONT_API_URL` through
//!    `api_url_from_env`) wins. Trailing slashes are trimmed.
//! 2. Otherwise the base is `<origin>/api`.
//! 3. With neither, `build` returns `Error::Config`.
//!
//! ## Bridges
//!
//! - `HttpClient`: desktop default `ReqwestHttpClient`
//! - `SecureStore`: desktop default `KeyringSecureStore`
//!
//! Defaults are only injected with the `desktop-shims` feature; without it a
//! missing bridge is `Error::CapabilityMissing`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AdminConfig;
//! use std::sync::Arc;
//!
//! let config = AdminConfig::builder()
//!     .origin("https://admin.shop.test")
//!     .api_url_from_env()
//!     .http_client(Arc::new(MyHttpClient))
//!     .secure_store(Arc::new(MySecureStore))
//!     .build()?;
//!
//! assert_eq!(config.api_base_url, "https://admin.shop.test/api");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{HttpClient, SecureStore};
use std::sync::Arc;

/// Environment variable holding an explicit backend base URL.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Resolved configuration for the admin core.
#[derive(Clone)]
pub struct AdminConfig {
    /// Backend base URL without trailing slash, e.g. `https://shop.test/api`
    pub api_base_url: String,
    /// Base for resolving relative media paths, without trailing slash
    pub asset_base_url: String,
    pub http_client: Arc<dyn HttpClient>,
    pub secure_store: Arc<dyn SecureStore>,
    /// Broadcast buffer for the event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_base_url", &self.api_base_url)
            .field("asset_base_url", &self.asset_base_url)
            .field("http_client", &"HttpClient { ... }")
            .field("secure_store", &"SecureStore { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl AdminConfig {
    pub fn builder() -> AdminConfigBuilder {
        AdminConfigBuilder::default()
    }

    /// Validates the resolved configuration.
    pub fn validate(&self) -> Result<()> {
        validate_http_url("API base URL", &self.api_base_url)?;
        validate_http_url("Asset base URL", &self.asset_base_url)?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute URL for an API path such as `/brands/3`.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<()> {
    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return Err(Error::Config(format!(
            "{} must start with http:// or https:// (got '{}')",
            what, url
        )));
    };

    if rest.is_empty() || rest.starts_with('/') {
        return Err(Error::Config(format!("{} has no host (got '{}')", what, url)));
    }

    Ok(())
}

/// Join a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// `scheme://host[:port]` part of an absolute URL.
fn scheme_and_host(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")? + 3;
    let host_end = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i)
        .unwrap_or(url.len());
    Some(&url[..host_end])
}

fn trim_url(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Other hosts: inject an adapter with .http_client()."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn secure_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SecureStore".to_string(),
        message: "SecureStore implementation is required to persist the admin session. \
                 Desktop: enable the 'desktop-shims' feature to use the OS keychain. \
                 Tests: inject bridge_desktop::MemorySecureStore."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: format!("Default ReqwestHttpClient could not be created: {}", e),
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    use bridge_desktop::KeyringSecureStore;

    Ok(Arc::new(KeyringSecureStore::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    Err(secure_store_missing_error())
}

/// Builder for [`AdminConfig`].
#[derive(Default)]
pub struct AdminConfigBuilder {
    api_url: Option<String>,
    origin: Option<String>,
    asset_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    secure_store: Option<Arc<dyn SecureStore>>,
    event_buffer_size: Option<usize>,
}

impl AdminConfigBuilder {
    /// Explicit backend base URL. Takes precedence over `origin`.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_url(&url.into());
        self
    }

    /// Reads [`API_URL_ENV`]. Unset or empty values leave the builder unchanged.
    pub fn api_url_from_env(self) -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        self.api_url_from(value)
    }

    fn api_url_from(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.as_deref().and_then(trim_url) {
            self.api_url = Some(url);
        }
        self
    }

    /// Origin the console is served from, e.g. `https://admin.shop.test`.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = trim_url(&origin.into());
        self
    }

    /// Base for relative media paths.
    ///
    /// Defaults to the origin, or to the scheme and host of the API URL when
    /// only an override was given.
    pub fn asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = trim_url(&url.into());
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn secure_store(mut self, store: Arc<dyn SecureStore>) -> Self {
        self.secure_store = Some(store);
        self
    }

    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Resolves URLs, injects default bridges and validates.
    pub fn build(self) -> Result<AdminConfig> {
        let api_base_url = match (&self.api_url, &self.origin) {
            (Some(url), _) => url.clone(),
            (None, Some(origin)) => join_url(origin, "api"),
            (None, None) => {
                return Err(Error::Config(format!(
                    "Backend URL is required. Use .api_url(), set {} or provide .origin().",
                    API_URL_ENV
                )))
            }
        };

        let asset_base_url = self
            .asset_base_url
            .or_else(|| self.origin.clone())
            .or_else(|| scheme_and_host(&api_base_url).map(str::to_string))
            .unwrap_or_else(|| api_base_url.clone());

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let secure_store = match self.secure_store {
            Some(store) => store,
            None => provide_default_secure_store()?,
        };

        let config = AdminConfig {
            api_base_url,
            asset_base_url,
            http_client,
            secure_store,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;
        Ok(config)
    }
}
