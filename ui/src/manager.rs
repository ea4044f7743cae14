//! The UI registry and orchestrator.
//!
//! [`UiManager`] resolves UI types to descriptors, looks up or creates the context for a key,
//! delegates stacking to the owning [`UiLayer`] and keeps two indexes in step with the
//! instances that are actually alive: the key index used by lookup/close/back, and the
//! [`Dispatcher`] index used by the per-frame pass.
//!
//! Release is two-phase. The layer decides whether a context was torn down; only when it hands
//! the closed context back does the manager deregister the key and return the instance to the
//! [`AssetProvider`]. A request the layer ignores leaves every index untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut ui = UiManager::new(descriptors, assets);
//!
//! ui.open::<Inventory>(OpenParams::new().with(player_id))?;
//! ui.open::<ItemDetails>(OpenParams::new().with(item))?;
//!
//! loop {
//!     time = time.next();
//!     ui.update(time.delta);
//! }
//!
//! ui.back("bag/details"); // reveals the inventory again
//! ```

use std::{
    any::{TypeId, type_name},
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use crate::{
    assets::{AssetError, AssetProvider, LoadTicket},
    command::{CommandBuffer, NavCommand, Navigator},
    context::{ContextId, OpenParams, State, UiContext},
    descriptor::{Descriptors, UiDescriptor},
    dispatch::{DispatchReport, Dispatcher},
    error::UiError,
    layer::{Incoming, LayerId, LayerRegistry, LoadOutcome, UiLayer},
    panel::Panel,
};

/// Where the context registered under a key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    id: ContextId,
    layer: LayerId,
}

/// Owner of every layer, context index and the per-frame dispatch.
pub struct UiManager<A: AssetProvider> {
    descriptors: Arc<Descriptors>,
    assets: A,
    layers: LayerRegistry,
    keys: HashMap<String, Entry>,
    dispatcher: Dispatcher,
    /// Loads in flight, by ticket.
    loads: HashMap<LoadTicket, String>,
    /// Tickets whose context was closed before the load completed.
    cancelled: HashSet<LoadTicket>,
    commands: CommandBuffer,
    next_id: u64,
}

impl<A: AssetProvider> UiManager<A> {
    pub fn new(descriptors: impl Into<Arc<Descriptors>>, assets: A) -> Self {
        Self {
            descriptors: descriptors.into(),
            assets,
            layers: LayerRegistry::new(),
            keys: HashMap::new(),
            dispatcher: Dispatcher::new(),
            loads: HashMap::new(),
            cancelled: HashSet::new(),
            commands: CommandBuffer::new(),
            next_id: 0,
        }
    }

    /// Open the UI of type `T`, or bring it back if it is already open.
    ///
    /// Returns the instance as a `T`, or `None` when the instance is still loading or is of a
    /// different type. Fails with [`UiError::MissingDescriptor`] before anything is allocated
    /// when `T` was never registered.
    pub fn open<T: Panel>(&mut self, params: OpenParams) -> Result<Option<&mut T>, UiError> {
        let descriptor = self.descriptor(TypeId::of::<T>(), type_name::<T>())?;
        self.open_descriptor(&descriptor, params)?;
        Ok(self.get_ui_mut::<T>(descriptor.asset_key()))
    }

    /// Type-erased form of [`open`](Self::open).
    pub fn open_type(
        &mut self,
        type_id: TypeId,
        type_name: &'static str,
        params: OpenParams,
    ) -> Result<ContextId, UiError> {
        let descriptor = self.descriptor(type_id, type_name)?;
        self.open_descriptor(&descriptor, params)
    }

    fn descriptor(&self, type_id: TypeId, type_name: &'static str) -> Result<UiDescriptor, UiError> {
        self.descriptors
            .get_by_id(type_id)
            .ok_or(UiError::MissingDescriptor { type_name })
    }

    fn open_descriptor(
        &mut self,
        descriptor: &UiDescriptor,
        params: OpenParams,
    ) -> Result<ContextId, UiError> {
        let key = descriptor.asset_key();
        let layer_id = descriptor.layer();
        let layer = self.layers.get_or_create(layer_id, &mut self.assets)?;

        let (incoming, fresh) = match self.keys.get(key) {
            Some(entry) => (Incoming::Existing { id: entry.id, params }, false),
            None => {
                self.next_id += 1;
                let context = UiContext::new(ContextId::new(self.next_id), key, layer_id, params);
                (Incoming::New(context), true)
            }
        };

        let id = layer.operator_open(incoming, &mut self.assets)?;

        if fresh && let Some(context) = layer.context_mut(id) {
            if let Some(ticket) = context.pending() {
                self.loads.insert(ticket, key.to_owned());
            } else if is_updatable(context) {
                self.dispatcher.register(id, layer_id);
            }
        }
        self.keys.insert(key.to_owned(), Entry { id, layer: layer_id });
        Ok(id)
    }

    /// Complete a load that the asset provider answered with
    /// [`Instantiation::Pending`](crate::Instantiation::Pending).
    ///
    /// A load whose context was closed in the meantime is released immediately.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Box<dyn Panel>, AssetError>,
    ) -> Result<(), UiError> {
        if self.cancelled.remove(&ticket) {
            log::debug!("releasing cancelled load {ticket:?}");
            if let Ok(instance) = result {
                self.assets.release(instance);
            }
            return Ok(());
        }

        let waiting = self.loads.remove(&ticket).and_then(|key| {
            let entry = self.keys.get(&key).copied()?;
            Some((key, entry))
        });
        let Some((key, entry)) = waiting else {
            log::warn!("completion for unknown {ticket:?}");
            if let Ok(instance) = result {
                self.assets.release(instance);
            }
            return Err(UiError::UnknownTicket(ticket));
        };

        let Some(layer) = self.layers.get_mut(entry.layer) else {
            if let Ok(instance) = result {
                self.assets.release(instance);
            }
            return Err(UiError::UnknownTicket(ticket));
        };

        match layer.finish_open(entry.id, result) {
            LoadOutcome::Shown => {
                if let Some(context) = layer.context_mut(entry.id)
                    && is_updatable(context)
                {
                    self.dispatcher.register(entry.id, entry.layer);
                }
                Ok(())
            }
            LoadOutcome::Failed(context, source) => {
                self.release(context);
                Err(UiError::Asset { key, source })
            }
            LoadOutcome::Orphaned(instance) => {
                if let Some(instance) = instance {
                    self.assets.release(instance);
                }
                Err(UiError::UnknownTicket(ticket))
            }
        }
    }

    /// The instance registered under `key`, if it is a `T`.
    pub fn get_ui<T: Panel>(&self, key: &str) -> Option<&T> {
        self.context(key)?.instance_as::<T>()
    }

    pub fn get_ui_mut<T: Panel>(&mut self, key: &str) -> Option<&mut T> {
        let entry = self.keys.get(key)?;
        self.layers
            .get_mut(entry.layer)?
            .context_mut(entry.id)?
            .instance_as_mut::<T>()
    }

    /// The context registered under `key`.
    pub fn context(&self, key: &str) -> Option<&UiContext> {
        let entry = self.keys.get(key)?;
        self.layers.get(entry.layer)?.context(entry.id)
    }

    #[inline]
    pub fn state(&self, key: &str) -> Option<State> {
        self.context(key).map(UiContext::state)
    }

    #[inline]
    pub fn is_open(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Close the UI registered under `key`, wherever it sits on its layer.
    ///
    /// Returns whether anything was released. Unknown keys are ignored.
    pub fn close(&mut self, key: &str) -> bool {
        let Some(entry) = self.keys.get(key).copied() else {
            log::debug!("close of '{key}' ignored: not open");
            return false;
        };
        let closed = self
            .layers
            .get_mut(entry.layer)
            .and_then(|layer| layer.operator_close(entry.id));
        self.settle(closed)
    }

    /// Navigate back from the UI registered under `key`, revealing the entry below it.
    ///
    /// Only acts when `key` is the visible top of its layer. Returns whether anything was
    /// released.
    pub fn back(&mut self, key: &str) -> bool {
        let Some(entry) = self.keys.get(key).copied() else {
            log::debug!("back from '{key}' ignored: not open");
            return false;
        };
        let closed = self
            .layers
            .get_mut(entry.layer)
            .and_then(|layer| layer.back(entry.id));
        self.settle(closed)
    }

    /// Close every open UI, top-most layer first.
    pub fn close_all(&mut self) -> usize {
        let keys: Vec<String> = self
            .layers
            .iter()
            .rev()
            .flat_map(|layer| layer.iter().rev().map(|context| context.key().to_owned()))
            .collect();
        keys.iter().filter(|key| self.close(key)).count()
    }

    fn settle(&mut self, closed: Option<UiContext>) -> bool {
        match closed {
            Some(context) => {
                self.release(context);
                true
            }
            None => false,
        }
    }

    /// Deregister a closed context from every index and hand its instance back.
    fn release(&mut self, mut context: UiContext) {
        self.dispatcher.remove(context.id());
        if self
            .keys
            .get(context.key())
            .is_some_and(|entry| entry.id == context.id())
        {
            self.keys.remove(context.key());
        }
        if let Some(ticket) = context.pending() {
            self.loads.remove(&ticket);
            self.cancelled.insert(ticket);
            log::debug!("cancelled load {ticket:?} of '{}'", context.key());
        }
        if let Some(instance) = context.take_instance() {
            self.assets.release(instance);
        }
        log::debug!("released ui '{}'", context.key());
    }

    /// Run one frame: update every showing panel, then apply navigation queued meanwhile.
    pub fn update(&mut self, delta: Duration) -> DispatchReport {
        let report = self
            .dispatcher
            .dispatch(&mut self.layers, &self.commands, delta);
        self.flush_commands();
        report
    }

    /// Queue navigation requests to be applied by the next [`flush_commands`](Self::flush_commands).
    #[inline]
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.commands)
    }

    /// The command buffer behind [`navigator`](Self::navigator). Other threads may push into it.
    #[inline]
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// Apply all queued navigation commands in order. Returns how many were applied.
    pub fn flush_commands(&mut self) -> usize {
        let commands = self.commands.drain();
        let applied = commands.len();
        for command in commands {
            log::debug!("applying {command:?}");
            match command {
                NavCommand::Open {
                    type_id,
                    type_name,
                    params,
                } => {
                    if let Err(err) = self.open_type(type_id, type_name, params) {
                        log::error!("deferred open of '{type_name}' failed: {err}");
                    }
                }
                NavCommand::Close { key } => {
                    self.close(&key);
                }
                NavCommand::Back { key } => {
                    self.back(&key);
                }
            }
        }
        applied
    }

    #[inline]
    pub fn layer(&self, id: LayerId) -> Option<&UiLayer> {
        self.layers.get(id)
    }

    #[inline]
    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn descriptors(&self) -> &Descriptors {
        &self.descriptors
    }

    #[inline]
    pub fn assets(&self) -> &A {
        &self.assets
    }

    #[inline]
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    /// Keys of every open UI, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of open UIs.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Probe the update capability of a freshly attached instance.
fn is_updatable(context: &mut UiContext) -> bool {
    context
        .instance_mut()
        .is_some_and(|instance| instance.as_update().is_some())
}
