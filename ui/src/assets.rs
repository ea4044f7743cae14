//! The asset/instance provider seam.
//!
//! The UI stack never creates or destroys visuals itself. Every instance is produced by
//! [`AssetProvider::instantiate`] into the container of its layer, and handed back through
//! [`AssetProvider::release`] once the owning context is closed.

use std::{error::Error, fmt};

use crate::{layer::LayerId, panel::Panel};

/// Opaque handle to the visual container allocated for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerHandle(u64);

impl ContainerHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Identifies an instantiation that completes later through
/// [`UiManager::complete_load`](crate::UiManager::complete_load).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Result of asking the provider for an instance.
pub enum Instantiation {
    /// The instance is available immediately.
    Ready(Box<dyn Panel>),
    /// The instance is being loaded; completion is reported with the ticket.
    Pending(LoadTicket),
}

impl fmt::Debug for Instantiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instantiation::Ready(_) => write!(f, "Ready(..)"),
            Instantiation::Pending(ticket) => write!(f, "Pending({ticket:?})"),
        }
    }
}

/// Failure reported by an [`AssetProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetError {
    message: String,
}

impl AssetError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for AssetError {}

/// Host collaborator that creates and destroys panel visuals.
pub trait AssetProvider {
    /// Allocate the visual container for a layer. Called once, the first time the layer is used.
    fn create_container(&mut self, layer: LayerId) -> Result<ContainerHandle, AssetError>;

    /// Instantiate the visual registered under `asset_key` inside `parent`.
    fn instantiate(
        &mut self,
        asset_key: &str,
        parent: ContainerHandle,
    ) -> Result<Instantiation, AssetError>;

    /// Release an instance previously produced by [`instantiate`](Self::instantiate).
    fn release(&mut self, instance: Box<dyn Panel>);
}
