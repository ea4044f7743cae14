//! Per-type UI configuration.
//!
//! Every UI type that can be opened is described by a [`UiDescriptor`]: the asset key its
//! visual is instantiated from (also the key it is indexed and closed by) and the layer it lives
//! on. Descriptors are registered once at startup in a [`Descriptors`] table, keyed by the Rust
//! type, either explicitly or from the compile-time descriptor generated by
//! `#[derive(UiConfig)]`.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(UiConfig)]
//! #[ui(asset = "menu/settings", layer = 1)]
//! struct Settings;
//!
//! let descriptors = Descriptors::new();
//! descriptors.register::<Settings>();
//! descriptors.register_as::<Inventory>(UiDescriptor::owned(config.inventory_key, LayerId::new(2)));
//! ```
//!
//! # Thread Safety
//!
//! Lookups are lock-free via `DashMap`, so a table can be built on a loader thread and shared
//! behind an `Arc`.

use std::{
    any::{TypeId, type_name},
    borrow::Cow,
};

use dashmap::DashMap;

use crate::layer::LayerId;

/// Immutable configuration of a UI type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiDescriptor {
    asset_key: Cow<'static, str>,
    layer: LayerId,
}

impl UiDescriptor {
    /// A descriptor with a static asset key, usable in const context.
    #[inline]
    pub const fn new(asset_key: &'static str, layer: LayerId) -> Self {
        Self {
            asset_key: Cow::Borrowed(asset_key),
            layer,
        }
    }

    /// A descriptor whose asset key is only known at runtime.
    pub fn owned(asset_key: impl Into<String>, layer: LayerId) -> Self {
        Self {
            asset_key: Cow::Owned(asset_key.into()),
            layer,
        }
    }

    #[inline]
    pub fn asset_key(&self) -> &str {
        &self.asset_key
    }

    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }
}

/// Compile-time descriptor of a UI type. Usually derived with `#[derive(UiConfig)]`.
pub trait UiConfig: 'static {
    const DESCRIPTOR: UiDescriptor;
}

/// A registered descriptor together with the name of the type it belongs to.
#[derive(Debug, Clone)]
struct Entry {
    type_name: &'static str,
    descriptor: UiDescriptor,
}

/// Registration table mapping UI types to their descriptors.
#[derive(Default)]
pub struct Descriptors {
    entries: DashMap<TypeId, Entry>,
}

impl Descriptors {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register `T` with its compile-time descriptor.
    pub fn register<T: UiConfig>(&self) -> &Self {
        self.register_as::<T>(T::DESCRIPTOR)
    }

    /// Register `T` with an explicit descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered with a different descriptor, or if another type
    /// already claims the same asset key. Both would make key lookup ambiguous.
    pub fn register_as<T: 'static>(&self, descriptor: UiDescriptor) -> &Self {
        let type_id = TypeId::of::<T>();

        if let Some(existing) = self.entries.get(&type_id) {
            if existing.descriptor != descriptor {
                panic!(
                    "type '{}' is already registered with asset '{}', cannot register asset '{}'",
                    type_name::<T>(),
                    existing.descriptor.asset_key(),
                    descriptor.asset_key()
                );
            }
            return self;
        }

        if let Some(other) = self
            .entries
            .iter()
            .find(|entry| entry.descriptor.asset_key() == descriptor.asset_key())
        {
            panic!(
                "asset '{}' is already registered for type '{}', cannot register it for '{}'",
                descriptor.asset_key(),
                other.type_name,
                type_name::<T>()
            );
        }

        self.entries.insert(
            type_id,
            Entry {
                type_name: type_name::<T>(),
                descriptor,
            },
        );
        self
    }

    /// Descriptor of `T`, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<UiDescriptor> {
        self.get_by_id(TypeId::of::<T>())
    }

    /// Descriptor of the type identified by `type_id`, if registered.
    #[inline]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<UiDescriptor> {
        self.entries
            .get(&type_id)
            .map(|entry| entry.descriptor.clone())
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Panel, UiConfig};
    use std::{sync::Arc, thread};

    #[derive(UiConfig)]
    #[ui(asset = "menu/main", layer = 0)]
    struct MainMenu;

    impl Panel for MainMenu {}

    #[derive(UiConfig)]
    #[ui(asset = "hud/minimap", layer = 3)]
    struct Minimap;

    #[derive(UiConfig)]
    #[ui(asset = "menu/settings")]
    struct Settings;

    #[derive(UiConfig)]
    #[ui(layer = -1, asset = "world/backdrop")]
    struct Backdrop;

    struct Inventory;

    struct Impostor;

    #[test]
    fn derived_descriptor() {
        assert_eq!(MainMenu::DESCRIPTOR.asset_key(), "menu/main");
        assert_eq!(MainMenu::DESCRIPTOR.layer(), LayerId::new(0));
        assert_eq!(Minimap::DESCRIPTOR.layer(), LayerId::new(3));
    }

    #[test]
    fn derived_layer_defaults_to_zero() {
        assert_eq!(Settings::DESCRIPTOR.layer(), LayerId::new(0));
    }

    #[test]
    fn derived_layer_may_sit_below_zero() {
        assert_eq!(Backdrop::DESCRIPTOR.layer(), LayerId::new(-1));
        assert!(Backdrop::DESCRIPTOR.layer() < MainMenu::DESCRIPTOR.layer());
    }

    #[test]
    fn register_and_lookup() {
        // Given
        let descriptors = Descriptors::new();

        // When
        descriptors
            .register::<MainMenu>()
            .register_as::<Inventory>(UiDescriptor::owned("bag/inventory", LayerId::new(2)));

        // Then
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors.get::<MainMenu>(), Some(MainMenu::DESCRIPTOR));
        assert_eq!(
            descriptors.get_by_id(TypeId::of::<Inventory>()).map(|d| d.layer()),
            Some(LayerId::new(2))
        );
        assert!(!descriptors.contains::<Minimap>());
        assert!(descriptors.get::<Minimap>().is_none());
    }

    #[test]
    fn registering_twice_with_same_descriptor_is_idempotent() {
        let descriptors = Descriptors::new();

        descriptors.register::<MainMenu>();
        descriptors.register::<MainMenu>();

        assert_eq!(descriptors.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered with asset 'menu/main'")]
    fn conflicting_descriptor_for_type_panics() {
        let descriptors = Descriptors::new();

        descriptors.register::<MainMenu>();
        descriptors.register_as::<MainMenu>(UiDescriptor::new("menu/other", LayerId::new(0)));
    }

    #[test]
    #[should_panic(expected = "asset 'hud/minimap' is already registered for type")]
    fn shared_asset_key_panics() {
        let descriptors = Descriptors::new();

        descriptors.register::<Minimap>();
        descriptors.register_as::<Impostor>(UiDescriptor::new("hud/minimap", LayerId::new(1)));
    }

    #[test]
    fn shared_table_is_readable_across_threads() {
        // Given
        let descriptors = Arc::new(Descriptors::new());
        descriptors.register::<Minimap>();

        // When
        let layers: Vec<_> = (0..4)
            .map(|_| {
                let descriptors = Arc::clone(&descriptors);
                thread::spawn(move || descriptors.get::<Minimap>().map(|d| d.layer()))
            })
            .map(|handle| handle.join().unwrap())
            .collect();

        // Then
        assert!(layers.iter().all(|layer| *layer == Some(LayerId::new(3))));
    }
}
