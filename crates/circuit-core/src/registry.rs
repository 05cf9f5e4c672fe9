//! # Component Registry
//!
//! Name → descriptor lookup populated once while plugins load, then read-only.
//! The registry is an owned value handed to whatever needs it rather than
//! process-wide state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::ComponentDescriptor;
use crate::error::RegistryError;
use crate::signal::Signal;

pub struct ComponentRegistry<V: Signal> {
    descriptors: HashMap<String, Arc<ComponentDescriptor<V>>>,
}

impl<V: Signal> Default for ComponentRegistry<V> {
    fn default() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }
}

impl<V: Signal> ComponentRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a descriptor under its name.
    ///
    /// Fails with [`RegistryError::DuplicateName`] if the name is taken; the
    /// existing descriptor is left in place.
    pub fn register(
        &mut self,
        descriptor: ComponentDescriptor<V>,
    ) -> Result<Arc<ComponentDescriptor<V>>, RegistryError> {
        if self.descriptors.contains_key(&descriptor.name) {
            tracing::warn!(component = %descriptor.name, "Duplicate component registration rejected");
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        tracing::info!(
            component = %descriptor.name,
            version = %descriptor.version,
            "Registered component"
        );
        let descriptor = Arc::new(descriptor);
        self.descriptors
            .insert(descriptor.name.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<ComponentDescriptor<V>>, RegistryError> {
        self.descriptors
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Every registered descriptor, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<ComponentDescriptor<V>>> + '_ {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
