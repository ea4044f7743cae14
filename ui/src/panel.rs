//! The capabilities a UI instance exposes to the stack.
//!
//! A [`Panel`] receives lifecycle hooks as its context moves through the state machine. Panels
//! that want per-frame work additionally expose the [`Update`] capability through
//! [`Panel::as_update`]; the manager checks this once, when the instance is attached, and only
//! then indexes the context for dispatch.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Toast {
//!     remaining: Duration,
//! }
//!
//! impl Panel for Toast {
//!     fn as_update(&mut self) -> Option<&mut dyn Update> {
//!         Some(self)
//!     }
//! }
//!
//! impl Update for Toast {
//!     fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError> {
//!         self.remaining = self.remaining.saturating_sub(frame.delta());
//!         if self.remaining.is_zero() {
//!             frame.navigator().close("hud/toast");
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::{any::Any, time::Duration};

use crate::{command::Navigator, context::OpenParams, error::PanelError};

/// Upcast helper so boxed panels can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A UI instance managed by the stack.
///
/// All hooks default to no-ops.
pub trait Panel: AsAny {
    /// Called when the panel is activated, and again when it is re-opened with fresh parameters.
    fn on_open(&mut self, _params: &OpenParams) {}

    /// Called whenever the panel becomes the visible entry of its layer.
    fn on_show(&mut self) {}

    /// Called when another panel covers this one on the same layer. The instance is retained.
    fn on_hide(&mut self) {}

    /// Called once when the panel is torn down, before the instance is released.
    fn on_close(&mut self) {}

    /// Per-frame capability. Return `Some(self)` to be driven by the dispatcher.
    fn as_update(&mut self) -> Option<&mut dyn Update> {
        None
    }
}

/// Per-frame update capability.
pub trait Update {
    fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError>;
}

/// What an update hook sees of the current tick.
pub struct UiFrame<'a> {
    delta: Duration,
    key: &'a str,
    navigator: Navigator<'a>,
}

impl<'a> UiFrame<'a> {
    pub(crate) fn new(delta: Duration, key: &'a str, navigator: Navigator<'a>) -> Self {
        Self {
            delta,
            key,
            navigator,
        }
    }

    /// Time elapsed since the previous tick.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Key of the panel being updated.
    #[inline]
    pub fn key(&self) -> &str {
        self.key
    }

    /// Queue navigation requests. They are applied after the dispatch pass completes.
    #[inline]
    pub fn navigator(&self) -> &Navigator<'a> {
        &self.navigator
    }
}
