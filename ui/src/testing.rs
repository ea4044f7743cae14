//! Test doubles: a recording asset provider and probe panels that journal their hooks.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    AssetError, AssetProvider, ContainerHandle, Instantiation, LayerId, LoadTicket, OpenParams,
    Panel, PanelError, UiFrame, Update,
};

/// Shared, ordered record of hook invocations such as `"menu/a:show"`.
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Count the journal lines equal to `line`.
pub(crate) fn count(journal: &Journal, line: &str) -> usize {
    journal.borrow().iter().filter(|l| *l == line).count()
}

type Script = Box<dyn FnMut(&mut UiFrame<'_>)>;

/// A panel that writes every hook it receives into a [`Journal`].
pub(crate) struct Probe {
    key: &'static str,
    journal: Journal,
    updatable: bool,
    failing: bool,
    updates: Rc<Cell<u32>>,
    last_params: usize,
    script: Option<Script>,
}

impl Probe {
    pub(crate) fn new(key: &'static str, journal: &Journal) -> Self {
        Self {
            key,
            journal: Rc::clone(journal),
            updatable: false,
            failing: false,
            updates: Rc::new(Cell::new(0)),
            last_params: 0,
            script: None,
        }
    }

    /// Expose the update capability.
    pub(crate) fn updatable(mut self) -> Self {
        self.updatable = true;
        self
    }

    /// Expose the update capability and fail every update.
    pub(crate) fn failing(mut self) -> Self {
        self.updatable = true;
        self.failing = true;
        self
    }

    /// Share the update counter with the test.
    pub(crate) fn counting(mut self, updates: &Rc<Cell<u32>>) -> Self {
        self.updates = Rc::clone(updates);
        self
    }

    /// Run `script` on every update.
    pub(crate) fn scripted(mut self, script: impl FnMut(&mut UiFrame<'_>) + 'static) -> Self {
        self.updatable = true;
        self.script = Some(Box::new(script));
        self
    }

    pub(crate) fn last_params(&self) -> usize {
        self.last_params
    }

    fn record(&self, hook: &str) {
        self.journal.borrow_mut().push(format!("{}:{}", self.key, hook));
    }
}

impl Panel for Probe {
    fn on_open(&mut self, params: &OpenParams) {
        self.last_params = params.len();
        self.record("open");
    }

    fn on_show(&mut self) {
        self.record("show");
    }

    fn on_hide(&mut self) {
        self.record("hide");
    }

    fn on_close(&mut self) {
        self.record("close");
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        if self.updatable { Some(self) } else { None }
    }
}

impl Update for Probe {
    fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError> {
        self.updates.set(self.updates.get() + 1);
        self.record("update");
        if let Some(script) = self.script.as_mut() {
            script(frame);
        }
        if self.failing {
            return Err(format!("{} exploded", self.key).into());
        }
        Ok(())
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.record("drop");
    }
}

/// Declares a distinct panel type wrapping a [`Probe`], with a compile-time descriptor.
macro_rules! probe_panel {
    ($name:ident, $asset:literal, $layer:literal) => {
        pub(crate) struct $name(pub(crate) $crate::testing::Probe);

        impl $crate::UiConfig for $name {
            const DESCRIPTOR: $crate::UiDescriptor =
                $crate::UiDescriptor::new($asset, $crate::LayerId::new($layer));
        }

        impl $crate::Panel for $name {
            fn on_open(&mut self, params: &$crate::OpenParams) {
                <$crate::testing::Probe as $crate::Panel>::on_open(&mut self.0, params)
            }

            fn on_show(&mut self) {
                <$crate::testing::Probe as $crate::Panel>::on_show(&mut self.0)
            }

            fn on_hide(&mut self) {
                <$crate::testing::Probe as $crate::Panel>::on_hide(&mut self.0)
            }

            fn on_close(&mut self) {
                <$crate::testing::Probe as $crate::Panel>::on_close(&mut self.0)
            }

            fn as_update(&mut self) -> Option<&mut dyn $crate::Update> {
                <$crate::testing::Probe as $crate::Panel>::as_update(&mut self.0)
            }
        }
    };
}

pub(crate) use probe_panel;

type Factory = Box<dyn Fn() -> Box<dyn Panel>>;

/// An in-memory [`AssetProvider`] that records every call it receives.
#[derive(Default)]
pub(crate) struct RecordingAssets {
    factories: HashMap<String, Factory>,
    deferred: HashSet<String>,
    broken: HashSet<String>,
    refuse_containers: bool,
    next_ticket: u64,
    pub(crate) containers: Vec<LayerId>,
    pub(crate) instantiated: Vec<String>,
    pub(crate) pending: Vec<(LoadTicket, String)>,
    pub(crate) released: usize,
}

impl RecordingAssets {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Instantiate `key` with `factory`.
    pub(crate) fn with(
        mut self,
        key: &str,
        factory: impl Fn() -> Box<dyn Panel> + 'static,
    ) -> Self {
        self.factories.insert(key.to_owned(), Box::new(factory));
        self
    }

    /// Load `key` asynchronously: `instantiate` hands out a ticket instead of an instance.
    pub(crate) fn deferred(mut self, key: &str) -> Self {
        self.deferred.insert(key.to_owned());
        self
    }

    /// Fail every instantiation of `key`.
    pub(crate) fn broken(mut self, key: &str) -> Self {
        self.broken.insert(key.to_owned());
        self
    }

    /// Fail every container allocation.
    pub(crate) fn without_containers(mut self) -> Self {
        self.refuse_containers = true;
        self
    }

    /// Build an instance of `key` the way a completed load would deliver it.
    pub(crate) fn build(&self, key: &str) -> Box<dyn Panel> {
        (self.factories[key])()
    }

    /// Ticket handed out for the most recent pending load of `key`.
    pub(crate) fn ticket(&self, key: &str) -> LoadTicket {
        self.pending
            .iter()
            .rev()
            .find(|(_, k)| k == key)
            .map(|(ticket, _)| *ticket)
            .unwrap_or_else(|| panic!("no pending load for '{key}'"))
    }
}

impl AssetProvider for RecordingAssets {
    fn create_container(&mut self, layer: LayerId) -> Result<ContainerHandle, AssetError> {
        if self.refuse_containers {
            return Err(AssetError::new("out of containers"));
        }
        self.containers.push(layer);
        Ok(ContainerHandle::new(self.containers.len() as u64))
    }

    fn instantiate(
        &mut self,
        asset_key: &str,
        _parent: ContainerHandle,
    ) -> Result<Instantiation, AssetError> {
        if self.broken.contains(asset_key) {
            return Err(AssetError::new(format!("asset '{asset_key}' is corrupt")));
        }
        if !self.factories.contains_key(asset_key) {
            return Err(AssetError::new(format!("asset '{asset_key}' not found")));
        }
        self.instantiated.push(asset_key.to_owned());
        if self.deferred.contains(asset_key) {
            self.next_ticket += 1;
            let ticket = LoadTicket::new(self.next_ticket);
            self.pending.push((ticket, asset_key.to_owned()));
            return Ok(Instantiation::Pending(ticket));
        }
        Ok(Instantiation::Ready(self.build(asset_key)))
    }

    fn release(&mut self, instance: Box<dyn Panel>) {
        self.released += 1;
        drop(instance);
    }
}
