use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    assets::AssetProvider,
    error::UiError,
    layer::{LayerId, UiLayer},
};

/// Mapping from layer id to [`UiLayer`], created lazily on first reference.
///
/// Layers iterate in ascending z-order.
#[derive(Default)]
pub struct LayerRegistry {
    layers: BTreeMap<LayerId, UiLayer>,
}

impl LayerRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
        }
    }

    /// The layer for `id`, allocating its container through `assets` the first time.
    ///
    /// A failed allocation leaves the registry untouched.
    pub fn get_or_create(
        &mut self,
        id: LayerId,
        assets: &mut dyn AssetProvider,
    ) -> Result<&mut UiLayer, UiError> {
        match self.layers.entry(id) {
            Entry::Occupied(occupied) => Ok(occupied.into_mut()),
            Entry::Vacant(vacant) => {
                let container = assets
                    .create_container(id)
                    .map_err(|source| UiError::Container { layer: id, source })?;
                log::debug!("created {id} in container {container:?}");
                Ok(vacant.insert(UiLayer::new(id, container)))
            }
        }
    }

    #[inline]
    pub fn get(&self, id: LayerId) -> Option<&UiLayer> {
        self.layers.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut UiLayer> {
        self.layers.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &UiLayer> {
        self.layers.values()
    }
}
