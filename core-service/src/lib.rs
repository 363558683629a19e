//! Admin console façade and bootstrap.
//!
//! [`AdminConsole`] wires a resolved [`AdminConfig`] into the shared core:
//! session store, gateway, event bus and the storefront entity registry.
//! Screens reach everything through it.
//!
//! Desktop hosts enable the `desktop-shims` feature so the HTTP client and
//! keychain-backed secure store are provided by default. Other hosts inject
//! their own bridges through [`AdminConfig::builder`].
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_service::{AdminConfig, AdminConsole};
//!
//! let config = AdminConfig::builder()
//!     .origin("https://admin.shop.test")
//!     .api_url_from_env()
//!     .build()?;
//! let console = AdminConsole::new(config)?;
//!
//! console.auth().login("admin@shop.test", "secret").await?;
//! let stats = console.dashboard().stats().await;
//! # let _ = stats;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod media;
pub mod orders;
pub mod products;

pub use auth::AuthService;
pub use dashboard::{ChartPoint, DashboardService, DashboardStats};
pub use error::{CoreError, Result};
pub use media::MediaService;
pub use orders::{OrderService, OrderStatus};
pub use products::{NewVariant, ProductService};

pub use core_auth::AuthState;
pub use core_runtime::{AdminConfig, CoreEvent, EventStream};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{MemorySecureStore, ReqwestHttpClient};

use core_auth::SessionStore;
use core_gateway::HttpGateway;
use core_registry::{catalog, EntityRegistry, ResourceClient};
use core_runtime::events::EventBus;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share every underlying service.
#[derive(Clone, Debug)]
pub struct AdminConsole {
    gateway: HttpGateway,
    sessions: SessionStore,
    events: EventBus,
    registry: Arc<EntityRegistry>,
    asset_base_url: String,
}

impl AdminConsole {
    /// Build the console from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate or the entity
    /// catalog is inconsistent.
    pub fn new(config: AdminConfig) -> Result<Self> {
        config.validate()?;

        let sessions = SessionStore::new(Arc::clone(&config.secure_store));
        let events = EventBus::new(config.event_buffer_size);
        let gateway = HttpGateway::from_config(&config, sessions.clone(), events.clone());
        let registry = catalog::storefront_registry(&gateway)?;

        info!(
            api_base_url = %config.api_base_url,
            entities = registry.len(),
            "Admin console initialized"
        );

        Ok(Self {
            gateway,
            sessions,
            events,
            registry: Arc::new(registry),
            asset_base_url: config.asset_base_url,
        })
    }

    /// Authentication state at this moment.
    pub async fn state(&self) -> Result<AuthState> {
        Ok(self.sessions.state().await?)
    }

    /// Subscribe to notifications, session and resource events.
    pub fn subscribe(&self) -> EventStream {
        self.events.stream()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Typed client for any registered entity.
    pub fn resource<T: DeserializeOwned>(&self, name: &str) -> Result<ResourceClient<T>> {
        Ok(self.registry.client(name)?)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.gateway.clone(), self.sessions.clone(), self.events.clone())
    }

    pub fn orders(&self) -> Result<OrderService> {
        OrderService::new(&self.registry)
    }

    pub fn products(&self) -> Result<ProductService> {
        ProductService::new(&self.registry, self.gateway.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.gateway.clone())
    }

    pub fn media(&self) -> MediaService {
        MediaService::new(self.gateway.clone(), self.asset_base_url.clone())
    }

    /// Absolute URL of a stored asset, or the placeholder image.
    pub fn asset_url(&self, path: &str) -> String {
        media::asset_url(&self.asset_base_url, path)
    }
}
