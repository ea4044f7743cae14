//! Per-layer navigation stacks.
//!
//! A [`UiLayer`] owns the ordered stack of contexts for one z-order group and implements the
//! open, close and back transitions. The top of the stack is the most recently opened or revealed
//! context; at most one entry is [`State::Showing`] and every other settled entry is
//! [`State::Hidden`].
//!
//! Close and back hand the closed context back to the caller (`Some`) only when it was really
//! torn down. `None` means the request did not apply to this layer, and callers must leave their
//! own indexes untouched.

mod registry;

pub use registry::LayerRegistry;

use std::fmt;

use crate::{
    assets::{AssetError, AssetProvider, ContainerHandle, Instantiation},
    context::{ContextId, OpenParams, State, UiContext},
    error::UiError,
    panel::Panel,
};

/// Identifier of a z-order group. Lower ids sit below higher ids.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(i32);

impl LayerId {
    #[inline]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn raw(&self) -> i32 {
        self.0
    }
}

impl From<i32> for LayerId {
    #[inline]
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.0)
    }
}

/// The context handed to [`UiLayer::operator_open`].
pub enum Incoming {
    /// A freshly constructed context in [`State::Init`].
    New(UiContext),
    /// A context already on this layer, opened again with new parameters.
    Existing { id: ContextId, params: OpenParams },
}

/// Result of completing a pending load on a layer.
pub enum LoadOutcome {
    /// The waiting context is now showing.
    Shown,
    /// The load failed. The context was closed and removed from the stack.
    Failed(UiContext, AssetError),
    /// Nothing on this layer waits for the load. Any delivered instance is handed back.
    Orphaned(Option<Box<dyn Panel>>),
}

/// One z-order group and its navigation stack.
pub struct UiLayer {
    id: LayerId,
    container: ContainerHandle,
    stack: Vec<UiContext>,
}

impl UiLayer {
    pub(crate) fn new(id: LayerId, container: ContainerHandle) -> Self {
        Self {
            id,
            container,
            stack: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Container the layer's visuals are instantiated into.
    #[inline]
    pub fn container(&self) -> ContainerHandle {
        self.container
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The currently visible context, if any.
    pub fn showing(&self) -> Option<&UiContext> {
        self.stack
            .iter()
            .rev()
            .find(|context| context.state() == State::Showing)
    }

    #[inline]
    pub fn top(&self) -> Option<&UiContext> {
        self.stack.last()
    }

    pub fn context(&self, id: ContextId) -> Option<&UiContext> {
        self.stack.iter().find(|context| context.id() == id)
    }

    pub fn context_mut(&mut self, id: ContextId) -> Option<&mut UiContext> {
        self.stack.iter_mut().find(|context| context.id() == id)
    }

    pub fn find(&self, key: &str) -> Option<&UiContext> {
        self.stack.iter().find(|context| context.key() == key)
    }

    /// Contexts from the bottom of the stack to the top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &UiContext> {
        self.stack.iter()
    }

    fn position(&self, id: ContextId) -> Option<usize> {
        self.stack.iter().position(|context| context.id() == id)
    }

    fn loading(&self) -> Option<&UiContext> {
        self.stack
            .iter()
            .find(|context| context.state() == State::Opening)
    }

    /// Open a context on this layer.
    ///
    /// A new context is pushed and instantiated through `assets`; an existing one is refreshed
    /// when already showing, or moved to the top and revealed when hidden. The previously visible
    /// context is hidden, never destroyed. While a load is pending on this layer every open is
    /// rejected with [`UiError::Transitioning`].
    pub fn operator_open(
        &mut self,
        incoming: Incoming,
        assets: &mut dyn AssetProvider,
    ) -> Result<ContextId, UiError> {
        let key = match &incoming {
            Incoming::New(context) => context.key().to_owned(),
            Incoming::Existing { id, .. } => match self.context(*id) {
                Some(context) => context.key().to_owned(),
                None => return Err(UiError::UnknownContext(*id)),
            },
        };

        if let Some(loading) = self.loading() {
            log::warn!(
                "rejecting open of '{key}' on {}: '{}' is still loading",
                self.id,
                loading.key()
            );
            return Err(UiError::Transitioning { key });
        }

        match incoming {
            Incoming::New(context) => self.push(context, assets),
            Incoming::Existing { id, params } => self.reopen(id, params),
        }
    }

    fn push(
        &mut self,
        mut context: UiContext,
        assets: &mut dyn AssetProvider,
    ) -> Result<ContextId, UiError> {
        let id = context.id();
        let covered = self.hide_top();

        context.transition(State::Opening);
        match assets.instantiate(context.key(), self.container) {
            Ok(Instantiation::Ready(instance)) => {
                context.attach(instance);
                Self::show(&mut context);
            }
            Ok(Instantiation::Pending(ticket)) => {
                log::debug!("ui '{}' waiting on {ticket:?}", context.key());
                context.set_pending(Some(ticket));
            }
            Err(source) => {
                context.transition(State::Closing);
                context.transition(State::Closed);
                if covered {
                    self.reveal_top();
                }
                return Err(UiError::Asset {
                    key: context.key().to_owned(),
                    source,
                });
            }
        }

        self.stack.push(context);
        Ok(id)
    }

    fn reopen(&mut self, id: ContextId, params: OpenParams) -> Result<ContextId, UiError> {
        let position = self.position(id).ok_or(UiError::UnknownContext(id))?;

        match self.stack[position].state() {
            State::Showing => {
                let context = &mut self.stack[position];
                context.set_params(params);
                context.notify_open();
            }
            State::Hidden => {
                let mut context = self.stack.remove(position);
                self.hide_top();
                context.set_params(params);
                context.notify_open();
                context.transition(State::Showing);
                context.with_instance(|panel| panel.on_show());
                self.stack.push(context);
            }
            state => unreachable!(
                "context '{}' is {state:?} while on the stack of {}",
                self.stack[position].key(),
                self.id
            ),
        }
        Ok(id)
    }

    /// Complete the pending load of context `id`.
    pub fn finish_open(
        &mut self,
        id: ContextId,
        result: Result<Box<dyn Panel>, AssetError>,
    ) -> LoadOutcome {
        let Some(position) = self
            .stack
            .iter()
            .position(|context| context.id() == id && context.state() == State::Opening)
        else {
            return LoadOutcome::Orphaned(result.ok());
        };

        match result {
            Ok(instance) => {
                let context = &mut self.stack[position];
                context.set_pending(None);
                context.attach(instance);
                Self::show(context);
                LoadOutcome::Shown
            }
            Err(source) => {
                let mut context = self.stack.remove(position);
                context.set_pending(None);
                Self::teardown(&mut context);
                self.reveal_top();
                LoadOutcome::Failed(context, source)
            }
        }
    }

    /// Remove context `id` from the stack, wherever it sits.
    ///
    /// Removing the visible entry reveals the new top; removing a covered entry changes nothing
    /// visible. A context whose load is still pending is cancelled and closed; its ticket stays
    /// on the returned context so the late instance can be released.
    pub fn operator_close(&mut self, id: ContextId) -> Option<UiContext> {
        let Some(position) = self.position(id) else {
            log::warn!("close of {id:?} ignored: not on {}", self.id);
            return None;
        };

        let mut context = self.stack.remove(position);
        let was_visible = matches!(context.state(), State::Showing | State::Opening);
        Self::teardown(&mut context);
        if was_visible {
            self.reveal_top();
        }
        Some(context)
    }

    /// Pop context `id` if it is the visible top of the stack, revealing the entry below.
    ///
    /// At the stack floor this closes the last entry and leaves the layer empty.
    pub fn back(&mut self, id: ContextId) -> Option<UiContext> {
        match self.stack.last() {
            Some(top) if top.id() == id && top.state() == State::Showing => {}
            _ => {
                log::warn!("back from {id:?} ignored: not the visible top of {}", self.id);
                return None;
            }
        }

        let mut context = self.stack.pop()?;
        Self::teardown(&mut context);
        self.reveal_top();
        Some(context)
    }

    fn show(context: &mut UiContext) {
        context.notify_open();
        context.transition(State::Showing);
        context.with_instance(|panel| panel.on_show());
    }

    fn teardown(context: &mut UiContext) {
        context.transition(State::Closing);
        context.with_instance(|panel| panel.on_close());
        context.transition(State::Closed);
    }

    /// Hide the visible top, if any. Returns whether something was covered.
    fn hide_top(&mut self) -> bool {
        if let Some(top) = self.stack.last_mut()
            && top.state() == State::Showing
        {
            top.transition(State::Hidden);
            top.with_instance(|panel| panel.on_hide());
            return true;
        }
        false
    }

    fn reveal_top(&mut self) {
        if let Some(top) = self.stack.last_mut()
            && top.state() == State::Hidden
        {
            top.transition(State::Showing);
            top.with_instance(|panel| panel.on_show());
        }
    }
}

impl fmt::Debug for UiLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiLayer")
            .field("id", &self.id)
            .field("container", &self.container)
            .field("stack", &self.stack)
            .finish()
    }
}
