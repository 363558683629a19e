//! Order workflow.

use crate::error::{CoreError, Result};
use core_registry::catalog::ORDERS;
use core_registry::{EntityId, EntityRegistry, ResourceClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Fulfilled,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Fulfilled,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Fulfilled => "FULFILLED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown order status '{}'", value)))
    }
}

/// Orders screen operations.
#[derive(Clone, Debug)]
pub struct OrderService {
    orders: ResourceClient<Value>,
}

impl OrderService {
    pub fn new(registry: &EntityRegistry) -> Result<Self> {
        Ok(Self {
            orders: registry.client(ORDERS)?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        Ok(self.orders.list().await?)
    }

    pub async fn get(&self, id: impl Into<EntityId>) -> Result<Value> {
        Ok(self.orders.get(id).await?)
    }

    /// Move an order to `status` through `PATCH /orders/:id/status`.
    pub async fn transition(&self, id: impl Into<EntityId>, status: OrderStatus) -> Result<Value> {
        Ok(self.orders.set_status(id, status.as_str()).await?)
    }
}
