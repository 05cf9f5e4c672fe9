//! Frozen component + widget registries shared by every session.

use std::sync::Arc;

use circuit_core::{ComponentDescriptor, ComponentRegistry, RegistryError, Signal};

use crate::widget::{Widget, WidgetRegistry};

/// Component and widget registries after startup.
///
/// Built once by [`crate::CircuitBuilder::init`] and shared read-only behind an `Arc`.
pub struct Registry<V: Signal> {
    components: ComponentRegistry<V>,
    widgets: WidgetRegistry<V>,
}

/// One picker entry: a component and its widget, if it has one.
pub struct CatalogEntry<'a, V: Signal> {
    pub component: &'a Arc<ComponentDescriptor<V>>,
    pub widget: Option<&'a Widget<V>>,
}

impl<V: Signal> CatalogEntry<'_, V> {
    pub fn name(&self) -> &str {
        &self.component.name
    }

    /// Widget category, empty for components without a widget.
    pub fn category(&self) -> &str {
        self.widget.map_or("", |w| w.descriptor.category.as_str())
    }
}

impl<V: Signal> Registry<V> {
    pub fn new(components: ComponentRegistry<V>, widgets: WidgetRegistry<V>) -> Self {
        Self {
            components,
            widgets,
        }
    }

    pub fn components(&self) -> &ComponentRegistry<V> {
        &self.components
    }

    pub fn widgets(&self) -> &WidgetRegistry<V> {
        &self.widgets
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<ComponentDescriptor<V>>, RegistryError> {
        self.components.lookup(name)
    }

    pub fn widget(&self, name: &str) -> Option<&Widget<V>> {
        self.widgets.get(name)
    }

    /// Every component merged with its widget, sorted by (category, name).
    pub fn catalog(&self) -> Vec<CatalogEntry<'_, V>> {
        let mut entries: Vec<_> = self
            .components
            .all()
            .map(|component| CatalogEntry {
                component,
                widget: self.widgets.get(&component.name),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.category()
                .cmp(b.category())
                .then_with(|| a.name().cmp(b.name()))
        });
        entries
    }
}
