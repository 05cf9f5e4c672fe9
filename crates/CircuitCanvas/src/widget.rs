//! # Widgets
//!
//! A widget is the visual half of a component, paired with it by name. The
//! widget registry holds one renderable instance per widget descriptor plus
//! the images it draws with; images are resolved to opaque handles by an
//! [`ImageLoader`] supplied by the host.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use circuit_core::{ComponentInstance, ComponentRegistry, RegistryError, Signal};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to an image the host has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// An image file referenced by a widget, and its handle once loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub file: String,
    #[serde(skip)]
    pub loaded: Option<ImageHandle>,
}

impl ImageAsset {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            loaded: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
}

/// What a widget wants drawn for a component this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderImage {
    /// Key into the widget's `images`.
    pub image: String,
    /// Size in workspace units, centered on the component position.
    pub size: Vec2,
}

impl RenderImage {
    pub fn new(image: impl Into<String>, size: Vec2) -> Self {
        Self {
            image: image.into(),
            size,
        }
    }
}

/// Visual behavior of a widget.
///
/// Pin positions are in unrotated local coordinates, with the origin at the
/// corner of the render image.
pub trait Renderable<V: Signal>: Send + Sync {
    fn render_image(&self, component: &ComponentInstance<V>) -> RenderImage;

    fn input_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::ZERO
    }

    fn output_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::ZERO
    }
}

pub type WidgetFactory<V> = Arc<dyn Fn() -> Box<dyn Renderable<V>> + Send + Sync>;

pub struct WidgetDescriptor<V: Signal> {
    /// Name of the component this widget draws.
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Picker grouping.
    pub category: String,
    pub icon: ImageAsset,
    pub images: HashMap<String, ImageAsset>,
    pub version: String,
    create: WidgetFactory<V>,
}

impl<V: Signal> WidgetDescriptor<V> {
    pub fn new<F>(
        name: impl Into<String>,
        display_name: impl Into<String>,
        category: impl Into<String>,
        create: F,
    ) -> Self
    where
        F: Fn() -> Box<dyn Renderable<V>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            category: category.into(),
            icon: ImageAsset::default(),
            images: HashMap::new(),
            version: "1.0.0".to_string(),
            create: Arc::new(create),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_icon(mut self, file: impl Into<String>) -> Self {
        self.icon = ImageAsset::new(file);
        self
    }

    pub fn with_image(mut self, key: impl Into<String>, file: impl Into<String>) -> Self {
        self.images.insert(key.into(), ImageAsset::new(file));
        self
    }

    pub fn create(&self) -> Box<dyn Renderable<V>> {
        (self.create)()
    }
}

impl<V: Signal> fmt::Debug for WidgetDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("category", &self.category)
            .field("images", &self.images)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// A registered widget: its descriptor and the single renderable built from it.
pub struct Widget<V: Signal> {
    pub descriptor: WidgetDescriptor<V>,
    renderable: Box<dyn Renderable<V>>,
}

impl<V: Signal> Widget<V> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn renderable(&self) -> &dyn Renderable<V> {
        self.renderable.as_ref()
    }

    /// Handle of a loaded image, `None` when unknown or not loaded.
    pub fn image(&self, key: &str) -> Option<ImageHandle> {
        self.descriptor.images.get(key).and_then(|asset| asset.loaded)
    }
}

impl<V: Signal> fmt::Debug for Widget<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

pub struct WidgetRegistry<V: Signal> {
    widgets: HashMap<String, Widget<V>>,
}

impl<V: Signal> Default for WidgetRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Signal> WidgetRegistry<V> {
    pub fn new() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }

    /// Pairs a widget with the already-registered component of the same name.
    pub fn register(
        &mut self,
        descriptor: WidgetDescriptor<V>,
        components: &ComponentRegistry<V>,
    ) -> Result<(), RegistryError> {
        if !components.contains(&descriptor.name) {
            tracing::warn!(widget = %descriptor.name, "No component registered for widget");
            return Err(RegistryError::NotFound(descriptor.name));
        }
        if self.widgets.contains_key(&descriptor.name) {
            tracing::warn!(widget = %descriptor.name, "Widget already registered");
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        tracing::info!(
            widget = %descriptor.name,
            category = %descriptor.category,
            images = descriptor.images.len(),
            "Registered component widget"
        );
        let renderable = descriptor.create();
        self.widgets.insert(
            descriptor.name.clone(),
            Widget {
                descriptor,
                renderable,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Widget<V>> {
        self.widgets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Widget<V>> + '_ {
        self.widgets.values()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Resolves every icon and image through `loader`.
    ///
    /// Returns `false` if any image failed; failures are logged and leave the
    /// asset unloaded, so the affected components are skipped when drawing.
    pub async fn load_images(&mut self, loader: &dyn ImageLoader) -> bool {
        let mut all_loaded = true;
        for widget in self.widgets.values_mut() {
            let name = widget.descriptor.name.clone();
            let descriptor = &mut widget.descriptor;
            let assets = std::iter::once(&mut descriptor.icon)
                .filter(|icon| !icon.file.is_empty())
                .chain(descriptor.images.values_mut());

            for asset in assets {
                match loader.load_image(&name, &asset.file).await {
                    Ok(handle) => asset.loaded = Some(handle),
                    Err(e) => {
                        tracing::error!(
                            widget = %name,
                            file = %asset.file,
                            error = %e,
                            "Failed to load widget image"
                        );
                        asset.loaded = None;
                        all_loaded = false;
                    }
                }
            }
        }
        all_loaded
    }
}

/// Host collaborator that turns image files into drawable handles.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load_image(&self, widget: &str, file: &str) -> anyhow::Result<ImageHandle>;
}
