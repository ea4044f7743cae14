use std::collections::HashMap;

use rusty_ui::{AssetError, AssetProvider, ContainerHandle, Instantiation, LayerId, Panel};

use crate::panels::{MainMenu, Settings, StatusBar, Toast};

type Factory = fn() -> Box<dyn Panel>;

fn build<T: Panel + Default>() -> Box<dyn Panel> {
    Box::new(T::default())
}

/// Builds panels in memory from a table of factories keyed by asset key.
pub struct DemoAssets {
    factories: HashMap<&'static str, Factory>,
    containers: u64,
    pub live: usize,
}

impl DemoAssets {
    pub fn new() -> Self {
        let factories = HashMap::from([
            ("menu/main", build::<MainMenu> as Factory),
            ("menu/settings", build::<Settings>),
            ("hud/status", build::<StatusBar>),
            ("hud/toast", build::<Toast>),
        ]);
        Self {
            factories,
            containers: 0,
            live: 0,
        }
    }
}

impl AssetProvider for DemoAssets {
    fn create_container(&mut self, layer: LayerId) -> Result<ContainerHandle, AssetError> {
        self.containers += 1;
        log::debug!("allocated container {} for {layer}", self.containers);
        Ok(ContainerHandle::new(self.containers))
    }

    fn instantiate(
        &mut self,
        asset_key: &str,
        _parent: ContainerHandle,
    ) -> Result<Instantiation, AssetError> {
        let factory = self
            .factories
            .get(asset_key)
            .ok_or_else(|| AssetError::new(format!("no asset named '{asset_key}'")))?;
        self.live += 1;
        Ok(Instantiation::Ready(factory()))
    }

    fn release(&mut self, instance: Box<dyn Panel>) {
        self.live -= 1;
        drop(instance);
    }
}
