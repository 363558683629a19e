//! Entity Registry
//!
//! Ordered, immutable catalog of [`EntityDescriptor`]s, validated once when
//! built:
//!
//! - entity names are non-empty and unique
//! - field keys are unique within a descriptor
//! - select fields declare at least one option, with no duplicates

use crate::client::ResourceClient;
use crate::descriptor::EntityDescriptor;
use crate::error::{RegistryError, Result};
use crate::field::FieldKind;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    descriptors: Vec<Arc<EntityDescriptor>>,
    index: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Validate `descriptors` and build the registry, keeping their order.
    pub fn new(descriptors: impl IntoIterator<Item = EntityDescriptor>) -> Result<Self> {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();

        for descriptor in descriptors {
            validate(&descriptor)?;
            if index.contains_key(descriptor.name()) {
                return Err(RegistryError::DuplicateEntity(descriptor.name().to_string()));
            }
            index.insert(descriptor.name().to_string(), ordered.len());
            ordered.push(Arc::new(descriptor));
        }

        debug!(entities = ordered.len(), "Entity registry built");
        Ok(Self {
            descriptors: ordered,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EntityDescriptor>> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Like [`get`](Self::get), failing with `UnknownEntity`.
    pub fn require(&self, name: &str) -> Result<&Arc<EntityDescriptor>> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownEntity(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entity names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDescriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Typed client for the entity `name`.
    pub fn client<T: DeserializeOwned>(&self, name: &str) -> Result<ResourceClient<T>> {
        self.require(name)
            .map(|descriptor| ResourceClient::new(Arc::clone(descriptor)))
    }
}

fn validate(descriptor: &EntityDescriptor) -> Result<()> {
    if descriptor.name().trim().is_empty() {
        return Err(RegistryError::EmptyName);
    }

    let mut keys = HashSet::new();
    for field in descriptor.fields() {
        if !keys.insert(field.key.as_str()) {
            return Err(RegistryError::DuplicateField {
                entity: descriptor.name().to_string(),
                key: field.key.clone(),
            });
        }

        if let FieldKind::Select { options } = &field.kind {
            let invalid = |reason: &str| RegistryError::InvalidSelect {
                entity: descriptor.name().to_string(),
                key: field.key.clone(),
                reason: reason.to_string(),
            };
            if options.is_empty() {
                return Err(invalid("no options"));
            }
            let mut seen = HashSet::new();
            if !options.iter().all(|option| seen.insert(option.as_str())) {
                return Err(invalid("duplicate option"));
            }
        }
    }

    Ok(())
}
