//! Panel types and an allocation-free asset provider shared by the benchmarks.

use std::any::{TypeId, type_name};

use rusty_ui::{
    AssetError, AssetProvider, ContainerHandle, Descriptors, Instantiation, LayerId, Panel,
    PanelError, UiDescriptor, UiFrame, UiManager, Update,
};

/// Number of distinct panel types the fixtures register.
pub const SLOTS: usize = 16;

/// Number of layers the slots are spread over.
pub const LAYERS: i32 = 4;

/// A panel type per `N`, so every slot has its own descriptor.
#[derive(Default)]
pub struct Slot<const N: usize> {
    pub ticks: u64,
}

impl<const N: usize> Panel for Slot<N> {
    fn as_update(&mut self) -> Option<&mut dyn Update> {
        Some(self)
    }
}

impl<const N: usize> Update for Slot<N> {
    fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError> {
        self.ticks = self.ticks.wrapping_add(frame.delta().as_nanos() as u64);
        Ok(())
    }
}

/// Type identity of one registered slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotType {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub asset_key: &'static str,
}

type Factory = fn() -> Box<dyn Panel>;

fn build<const N: usize>() -> Box<dyn Panel> {
    Box::new(Slot::<N>::default())
}

macro_rules! slots {
    ($($n:literal),* $(,)?) => {
        /// Descriptor, type and factory of every slot.
        fn slot_table() -> Vec<(SlotType, LayerId, Factory)> {
            vec![$(
                (
                    SlotType {
                        type_id: TypeId::of::<Slot<$n>>(),
                        type_name: type_name::<Slot<$n>>(),
                        asset_key: concat!("slot/", $n),
                    },
                    LayerId::new($n % LAYERS),
                    build::<$n> as Factory,
                )
            ),*]
        }

        fn register_slots(descriptors: &Descriptors) {
            $(
                descriptors.register_as::<Slot<$n>>(UiDescriptor::new(
                    concat!("slot/", $n),
                    LayerId::new($n % LAYERS),
                ));
            )*
        }
    };
}

slots!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);

/// Every slot type, in slot order.
pub fn slot_types() -> Vec<SlotType> {
    slot_table().into_iter().map(|(slot, _, _)| slot).collect()
}

/// A descriptor table with every slot registered.
pub fn descriptors() -> Descriptors {
    let descriptors = Descriptors::new();
    register_slots(&descriptors);
    descriptors
}

/// Instantiates slots synchronously from a factory table indexed by slot number.
pub struct BenchAssets {
    factories: Vec<(&'static str, Factory)>,
    containers: u64,
}

impl BenchAssets {
    pub fn new() -> Self {
        Self {
            factories: slot_table()
                .into_iter()
                .map(|(slot, _, factory)| (slot.asset_key, factory))
                .collect(),
            containers: 0,
        }
    }
}

impl Default for BenchAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProvider for BenchAssets {
    fn create_container(&mut self, _layer: LayerId) -> Result<ContainerHandle, AssetError> {
        self.containers += 1;
        Ok(ContainerHandle::new(self.containers))
    }

    fn instantiate(
        &mut self,
        asset_key: &str,
        _parent: ContainerHandle,
    ) -> Result<Instantiation, AssetError> {
        let factory = asset_key
            .strip_prefix("slot/")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| self.factories.get(n))
            .map(|(_, factory)| *factory)
            .ok_or_else(|| AssetError::new(format!("unknown slot '{asset_key}'")))?;
        Ok(Instantiation::Ready(factory()))
    }

    fn release(&mut self, _instance: Box<dyn Panel>) {}
}

/// A manager with every slot registered and nothing open.
pub fn manager() -> UiManager<BenchAssets> {
    UiManager::new(descriptors(), BenchAssets::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_ui::{OpenParams, State};

    #[test]
    fn every_slot_opens() {
        // Given
        let mut ui = manager();

        // When
        for slot in slot_types() {
            ui.open_type(slot.type_id, slot.type_name, OpenParams::new())
                .unwrap();
        }

        // Then
        assert_eq!(ui.len(), SLOTS);
        assert_eq!(ui.layers().len(), LAYERS as usize);
        assert_eq!(ui.dispatcher().len(), SLOTS);
        assert_eq!(ui.state("slot/15"), Some(State::Showing));
        assert_eq!(ui.state("slot/3"), Some(State::Hidden));
    }
}
