//! Lifecycle records for open UIs.
//!
//! A [`UiContext`] describes one logical open UI: its key, owning layer, open-time parameters,
//! lifecycle [`State`] and the instance produced by the asset provider. Contexts are owned by
//! the stack of their [`UiLayer`](crate::UiLayer), which is also the only caller of
//! [`UiContext::transition`].
//!
//! # State machine
//!
//! ```text
//!   Init ──► Opening ──► Showing ◄──► Hidden
//!               │           │           │
//!               └────────► Closing ◄────┘
//!                           │
//!                           ▼
//!                         Closed
//! ```

use std::{any::Any, fmt, time::Duration};

use crate::{
    assets::LoadTicket,
    command::Navigator,
    error::{InvalidStateTransition, PanelError},
    layer::LayerId,
    panel::{Panel, UiFrame},
};

/// Identity of a context. Ids are never reused by a manager, so a fresh context for a key that
/// was closed earlier always has a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

impl ContextId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Lifecycle state of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Constructed, not yet handed to its layer.
    Init,
    /// The layer is instantiating or activating the visual.
    Opening,
    /// Visible and receiving per-frame updates.
    Showing,
    /// Covered by another context on the same layer. Not updated, instance retained.
    Hidden,
    /// Being torn down.
    Closing,
    /// Released. Terminal.
    Closed,
}

impl State {
    /// Whether `self -> next` is an edge of the state machine.
    pub const fn can_transition_to(self, next: State) -> bool {
        matches!(
            (self, next),
            (State::Init, State::Opening)
                | (State::Opening, State::Showing)
                | (State::Opening, State::Closing)
                | (State::Showing, State::Hidden)
                | (State::Hidden, State::Showing)
                | (State::Showing, State::Closing)
                | (State::Hidden, State::Closing)
                | (State::Closing, State::Closed)
        )
    }

    pub const fn check_transition(self, next: State) -> Result<(), InvalidStateTransition> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(InvalidStateTransition::new(self, next))
        }
    }
}

/// Ordered, opaque parameters captured when a UI is opened.
#[derive(Default)]
pub struct OpenParams {
    values: Vec<Box<dyn Any + Send>>,
}

impl OpenParams {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a value, builder style.
    pub fn with<T: Any + Send>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: Any + Send>(&mut self, value: T) {
        self.values.push(Box::new(value));
    }

    /// The value at `index`, if present and of type `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Any + Send)> {
        self.values.iter().map(|value| value.as_ref())
    }
}

impl fmt::Debug for OpenParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenParams").field("len", &self.values.len()).finish()
    }
}

/// The lifecycle record of one logical open UI.
pub struct UiContext {
    id: ContextId,
    key: String,
    layer: LayerId,
    params: OpenParams,
    state: State,
    instance: Option<Box<dyn Panel>>,
    pending: Option<LoadTicket>,
}

impl UiContext {
    /// Construct a context in [`State::Init`].
    pub fn new(id: ContextId, key: impl Into<String>, layer: LayerId, params: OpenParams) -> Self {
        Self {
            id,
            key: key.into(),
            layer,
            params,
            state: State::Init,
            instance: None,
            pending: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn params(&self) -> &OpenParams {
        &self.params
    }

    /// Ticket of the load this context is waiting on, if any.
    #[inline]
    pub fn pending(&self) -> Option<LoadTicket> {
        self.pending
    }

    #[inline]
    pub fn instance(&self) -> Option<&dyn Panel> {
        self.instance.as_deref()
    }

    #[inline]
    pub fn instance_mut(&mut self) -> Option<&mut dyn Panel> {
        match &mut self.instance {
            Some(instance) => Some(instance.as_mut()),
            None => None,
        }
    }

    /// The instance downcast to `T`.
    pub fn instance_as<T: Panel>(&self) -> Option<&T> {
        self.instance()?.as_any().downcast_ref::<T>()
    }

    pub fn instance_as_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.instance_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Move the context along an edge of the state machine.
    ///
    /// # Panics
    ///
    /// Panics if `next` is not reachable from the current state. Only the owning layer drives
    /// transitions, so an illegal edge is a defect in the layer, not a runtime condition.
    pub(crate) fn transition(&mut self, next: State) {
        if let Err(err) = self.state.check_transition(next) {
            panic!("context '{}' ({:?}): {}", self.key, self.id, err);
        }
        log::debug!("ui '{}': {:?} -> {:?}", self.key, self.state, next);
        self.state = next;
    }

    pub(crate) fn set_params(&mut self, params: OpenParams) {
        self.params = params;
    }

    pub(crate) fn set_pending(&mut self, ticket: Option<LoadTicket>) {
        self.pending = ticket;
    }

    pub(crate) fn attach(&mut self, instance: Box<dyn Panel>) {
        self.instance = Some(instance);
    }

    /// Detach the instance so it can be handed back to the asset provider.
    pub fn take_instance(&mut self) -> Option<Box<dyn Panel>> {
        self.instance.take()
    }

    /// Run the activation hook with the current parameters.
    pub(crate) fn notify_open(&mut self) {
        if let Some(instance) = self.instance.as_deref_mut() {
            instance.on_open(&self.params);
        }
    }

    /// Run the update hook, if the instance exposes one.
    pub(crate) fn update(
        &mut self,
        delta: Duration,
        navigator: Navigator<'_>,
    ) -> Option<Result<(), PanelError>> {
        let Self { key, instance, .. } = self;
        let updater = instance.as_deref_mut()?.as_update()?;
        let mut frame = UiFrame::new(delta, key, navigator);
        Some(updater.on_update(&mut frame))
    }

    pub(crate) fn with_instance(&mut self, hook: impl FnOnce(&mut dyn Panel)) {
        if let Some(instance) = self.instance.as_deref_mut() {
            hook(instance);
        }
    }
}

impl fmt::Debug for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiContext")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("layer", &self.layer)
            .field("state", &self.state)
            .field("params", &self.params)
            .field("instance", &self.instance.is_some())
            .field("pending", &self.pending)
            .finish()
    }
}
