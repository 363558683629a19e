//! Products screen: CRUD, status toggle and variants.

use crate::error::Result;
use core_gateway::{HttpGateway, RequestBody};
use core_registry::catalog::PRODUCTS;
use core_registry::{EntityId, EntityRegistry, ResourceClient};
use core_runtime::events::{CoreEvent, ResourceEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

const VARIANTS_PATH: &str = "/variants";

/// Payload of `POST /variants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    pub product_id: i64,
    pub name: String,
    pub color_hex: String,
    pub extra_price: f64,
    pub sale_price: f64,
    pub cost_price: f64,
    pub stock: i64,
}

impl NewVariant {
    /// Variant priced off its product: sold at `base_price + extra_price`,
    /// costed at `base_price`.
    pub fn priced_from(
        product_id: i64,
        name: impl Into<String>,
        color_hex: impl Into<String>,
        extra_price: f64,
        base_price: f64,
        stock: i64,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            color_hex: color_hex.into(),
            extra_price,
            sale_price: base_price + extra_price,
            cost_price: base_price,
            stock,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProductService {
    products: ResourceClient<Value>,
    gateway: HttpGateway,
}

impl ProductService {
    pub fn new(registry: &EntityRegistry, gateway: HttpGateway) -> Result<Self> {
        Ok(Self {
            products: registry.client(PRODUCTS)?,
            gateway,
        })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        Ok(self.products.list().await?)
    }

    pub async fn get(&self, id: impl Into<EntityId>) -> Result<Value> {
        Ok(self.products.get(id).await?)
    }

    /// Create a product. Forms with an image are sent as multipart.
    pub async fn create(&self, data: impl Into<RequestBody>) -> Result<Value> {
        Ok(self.products.create(data).await?)
    }

    pub async fn update(
        &self,
        id: impl Into<EntityId>,
        data: impl Into<RequestBody>,
    ) -> Result<Value> {
        Ok(self.products.update(id, data).await?)
    }

    pub async fn remove(&self, id: impl Into<EntityId>) -> Result<Value> {
        Ok(self.products.remove(id).await?)
    }

    /// Flip a product between ACTIVE and INACTIVE.
    ///
    /// The server answers `{ product: {...} }`; the inner product is
    /// returned, or the whole body when it has no `product` field.
    #[instrument(skip(self, id))]
    pub async fn toggle(&self, id: impl Into<EntityId>) -> Result<Value> {
        let id = id.into();
        let path = format!("/{}/{}/toggle", PRODUCTS, id.path_segment());
        let body = self.gateway.patch(&path, RequestBody::Empty).await?;

        self.gateway
            .events()
            .emit(CoreEvent::Resource(ResourceEvent::Toggled {
                entity: PRODUCTS.to_string(),
                id: id.to_string(),
            }));

        Ok(match body {
            Value::Object(mut map) if map.contains_key("product") => {
                map.remove("product").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    /// Variants of a product. A failed read or a non-array body yields an
    /// empty list.
    pub async fn variants_for(&self, product_id: impl Into<EntityId>) -> Vec<Value> {
        let product_id = product_id.into();
        let path = format!("{}/product/{}", VARIANTS_PATH, product_id.path_segment());
        match self.gateway.get(&path).await {
            Ok(Value::Array(variants)) => variants,
            Ok(_) => {
                debug!(product = %product_id, "Variant response is not a list");
                Vec::new()
            }
            Err(e) => {
                warn!(product = %product_id, error = %e, "No variants found for product");
                Vec::new()
            }
        }
    }

    pub async fn add_variant(&self, variant: &NewVariant) -> Result<Value> {
        let body = serde_json::to_value(variant)
            .map_err(|e| core_gateway::GatewayError::Encode(e.to_string()))?;
        Ok(self.gateway.post(VARIANTS_PATH, body).await?)
    }

    pub async fn remove_variant(&self, id: impl Into<EntityId>) -> Result<Value> {
        let path = format!("{}/{}", VARIANTS_PATH, id.into().path_segment());
        Ok(self.gateway.delete(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_pricing_and_shape() {
        let variant = NewVariant::priced_from(5, "Red", "#ff0000", 2.5, 10.0, 3);
        assert_eq!(
            serde_json::to_value(&variant).unwrap(),
            json!({
                "productId": 5,
                "name": "Red",
                "colorHex": "#ff0000",
                "extraPrice": 2.5,
                "salePrice": 12.5,
                "costPrice": 10.0,
                "stock": 3
            })
        );
    }
}
