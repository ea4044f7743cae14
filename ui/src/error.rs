//! Error types for the UI stack.
//!
//! Configuration defects ([`UiError::MissingDescriptor`]) fail loudly at open time. Runtime
//! failures of a single panel are isolated as [`PanelError`]s and never reach the caller of
//! [`UiManager::update`](crate::UiManager::update). Navigation requests that target something
//! which is not there are not errors at all; they are reported as `false`/`None`.

use std::{error::Error, fmt};

use crate::{
    assets::{AssetError, LoadTicket},
    context::{ContextId, State},
    layer::LayerId,
};

/// Failure reported by a panel's update hook.
pub type PanelError = Box<dyn Error + Send + Sync>;

/// Errors surfaced by [`UiManager`](crate::UiManager) operations.
#[derive(Debug)]
pub enum UiError {
    /// The requested UI type was never registered with a descriptor.
    MissingDescriptor {
        /// Name of the Rust type that was requested.
        type_name: &'static str,
    },
    /// The key (or its layer) is waiting on a pending load and cannot be opened again yet.
    Transitioning {
        /// Asset key of the rejected request.
        key: String,
    },
    /// The asset provider could not instantiate the visual for `key`.
    Asset {
        /// Asset key of the failed instantiation.
        key: String,
        /// Provider error.
        source: AssetError,
    },
    /// The asset provider could not allocate the container backing a layer.
    Container {
        /// Layer whose container allocation failed.
        layer: LayerId,
        /// Provider error.
        source: AssetError,
    },
    /// A load completion arrived for a ticket nobody is waiting on.
    UnknownTicket(LoadTicket),
    /// A re-open named a context that is not on the targeted layer.
    UnknownContext(ContextId),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::MissingDescriptor { type_name } => {
                write!(f, "no ui descriptor registered for type '{type_name}'")
            }
            UiError::Transitioning { key } => {
                write!(f, "ui '{key}' cannot be opened while a load is pending")
            }
            UiError::Asset { key, source } => {
                write!(f, "failed to instantiate ui '{key}': {source}")
            }
            UiError::Container { layer, source } => {
                write!(f, "failed to allocate container for {layer}: {source}")
            }
            UiError::UnknownTicket(ticket) => write!(f, "no pending load for {ticket:?}"),
            UiError::UnknownContext(id) => write!(f, "no context {id:?} on the targeted layer"),
        }
    }
}

impl Error for UiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UiError::Asset { source, .. } | UiError::Container { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// An illegal edge in the context state machine. Indicates a logic defect in the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStateTransition {
    /// The state the context was in.
    pub from: State,
    /// The state that was requested.
    pub to: State,
}

impl InvalidStateTransition {
    #[inline]
    pub const fn new(from: State, to: State) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for InvalidStateTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid state transition: {:?} -> {:?}", self.from, self.to)
    }
}

impl Error for InvalidStateTransition {}
