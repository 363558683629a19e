//! Operation Bindings
//!
//! Each descriptor carries an [`EntityOperations`] implementation. The REST
//! one, [`RestOperations`], maps the operations onto the canonical paths:
//!
//! | Operation    | Request                              |
//! |--------------|--------------------------------------|
//! | `list`       | `GET /<resource>`                    |
//! | `get`        | `GET /<resource>/:id`                |
//! | `create`     | `POST /<resource>`                   |
//! | `update`     | `PATCH /<resource>/:id`              |
//! | `remove`     | `DELETE /<resource>/:id`             |
//! | `toggle`     | `PATCH /<resource>/:id/toggle`       |
//! | `set_status` | `PATCH /<resource>/:id/status`       |
//!
//! `toggle` and `set_status` exist only where bound; elsewhere they fail
//! with `UnsupportedOperation` before any request is made.

use crate::id::EntityId;
use async_trait::async_trait;
use core_gateway::{GatewayError, HttpGateway, PayloadPolicy, RequestBody, Result};
use core_runtime::events::{CoreEvent, ResourceEvent};
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Build an `UnsupportedOperation` error for `entity`.
pub fn unsupported(entity: &str, operation: &str) -> GatewayError {
    GatewayError::UnsupportedOperation {
        entity: entity.to_string(),
        operation: operation.to_string(),
    }
}

/// Operations a screen can invoke on an entity.
#[async_trait]
pub trait EntityOperations: Send + Sync {
    /// Name of the entity these operations act on.
    fn entity(&self) -> &str;

    async fn list(&self) -> Result<Value>;

    async fn get(&self, id: &EntityId) -> Result<Value>;

    async fn create(&self, data: RequestBody) -> Result<Value>;

    /// Partial update.
    async fn update(&self, id: &EntityId, data: RequestBody) -> Result<Value>;

    async fn remove(&self, id: &EntityId) -> Result<Value>;

    /// Flip the server-side active/published flag.
    async fn toggle(&self, id: &EntityId) -> Result<Value> {
        let _ = id;
        Err(unsupported(self.entity(), "toggle"))
    }

    /// Move a record to a new workflow status.
    async fn set_status(&self, id: &EntityId, status: &str) -> Result<Value> {
        let _ = (id, status);
        Err(unsupported(self.entity(), "set_status"))
    }

    fn supports_toggle(&self) -> bool {
        false
    }

    fn supports_status_transition(&self) -> bool {
        false
    }
}

/// Optional operations bound on a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    pub toggle: bool,
    pub status_transition: bool,
}

/// [`EntityOperations`] over the [`HttpGateway`].
///
/// Successful writes are announced as [`ResourceEvent`]s.
#[derive(Debug, Clone)]
pub struct RestOperations {
    entity: String,
    base_path: String,
    gateway: HttpGateway,
    policy: PayloadPolicy,
    bindings: Bindings,
}

impl RestOperations {
    pub fn new(
        entity: impl Into<String>,
        base_path: impl Into<String>,
        gateway: HttpGateway,
        policy: PayloadPolicy,
        bindings: Bindings,
    ) -> Self {
        let base_path = format!("/{}", base_path.into().trim_matches('/'));
        Self {
            entity: entity.into(),
            base_path,
            gateway,
            policy,
            bindings,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn policy(&self) -> PayloadPolicy {
        self.policy
    }

    fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.base_path, id.path_segment())
    }

    fn announce(&self, event: ResourceEvent) {
        self.gateway.events().emit(CoreEvent::Resource(event));
    }
}

#[async_trait]
impl EntityOperations for RestOperations {
    fn entity(&self) -> &str {
        &self.entity
    }

    #[instrument(skip(self), fields(entity = %self.entity))]
    async fn list(&self) -> Result<Value> {
        self.gateway.get(&self.base_path).await
    }

    #[instrument(skip(self), fields(entity = %self.entity))]
    async fn get(&self, id: &EntityId) -> Result<Value> {
        self.gateway.get(&self.item_path(id)).await
    }

    #[instrument(skip(self, data), fields(entity = %self.entity))]
    async fn create(&self, data: RequestBody) -> Result<Value> {
        let created = self
            .gateway
            .post(&self.base_path, self.policy.apply(data))
            .await?;
        debug!("Record created");
        self.announce(ResourceEvent::Created {
            entity: self.entity.clone(),
        });
        Ok(created)
    }

    #[instrument(skip(self, data), fields(entity = %self.entity))]
    async fn update(&self, id: &EntityId, data: RequestBody) -> Result<Value> {
        let updated = self
            .gateway
            .patch(&self.item_path(id), self.policy.apply(data))
            .await?;
        self.announce(ResourceEvent::Updated {
            entity: self.entity.clone(),
            id: id.to_string(),
        });
        Ok(updated)
    }

    #[instrument(skip(self), fields(entity = %self.entity))]
    async fn remove(&self, id: &EntityId) -> Result<Value> {
        let removed = self.gateway.delete(&self.item_path(id)).await?;
        self.announce(ResourceEvent::Removed {
            entity: self.entity.clone(),
            id: id.to_string(),
        });
        Ok(removed)
    }

    #[instrument(skip(self), fields(entity = %self.entity))]
    async fn toggle(&self, id: &EntityId) -> Result<Value> {
        if !self.bindings.toggle {
            return Err(unsupported(&self.entity, "toggle"));
        }
        let path = format!("{}/toggle", self.item_path(id));
        let toggled = self.gateway.patch(&path, RequestBody::Empty).await?;
        self.announce(ResourceEvent::Toggled {
            entity: self.entity.clone(),
            id: id.to_string(),
        });
        Ok(toggled)
    }

    #[instrument(skip(self), fields(entity = %self.entity))]
    async fn set_status(&self, id: &EntityId, status: &str) -> Result<Value> {
        if !self.bindings.status_transition {
            return Err(unsupported(&self.entity, "set_status"));
        }
        let path = format!("{}/status", self.item_path(id));
        let changed = self
            .gateway
            .patch(&path, json!({ "status": status }))
            .await?;
        self.announce(ResourceEvent::StatusChanged {
            entity: self.entity.clone(),
            id: id.to_string(),
            status: status.to_string(),
        });
        Ok(changed)
    }

    fn supports_toggle(&self) -> bool {
        self.bindings.toggle
    }

    fn supports_status_transition(&self) -> bool {
        self.bindings.status_transition
    }
}
