//! Layered UI stack and lifecycle engine.
//!
//! `rusty_ui` owns the navigation state of modal/layered UI panels: which panel instances exist,
//! which layer (z-order group) each belongs to, which one is visible per layer, and how open,
//! close and back requests reshape those stacks. Concrete visuals are produced by a host supplied
//! [`AssetProvider`]; per-type configuration comes from a [`Descriptors`] table.
//!
//! ```rust,ignore
//! use rusty_ui::{Descriptors, OpenParams, Panel, UiConfig, UiManager};
//!
//! #[derive(UiConfig)]
//! #[ui(asset = "menu/main", layer = 0)]
//! struct MainMenu;
//!
//! impl Panel for MainMenu {}
//!
//! let mut descriptors = Descriptors::new();
//! descriptors.register::<MainMenu>();
//!
//! let mut ui = UiManager::new(descriptors, assets);
//! ui.open::<MainMenu>(OpenParams::new())?;
//! ui.update(time.delta);
//! ui.back("menu/main");
//! ```

extern crate self as rusty_ui;

pub mod assets;
pub mod command;
pub mod context;
pub mod core;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod layer;
pub mod manager;
pub mod panel;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::core::{
    ONE_FPS, SIXTY_FPS, Time,
    log::{ChannelLogger, LogMessage},
};
pub use assets::{AssetError, AssetProvider, ContainerHandle, Instantiation, LoadTicket};
pub use command::{CommandBuffer, NavCommand, Navigator};
pub use context::{ContextId, OpenParams, State, UiContext};
pub use descriptor::{Descriptors, UiConfig, UiDescriptor};
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{InvalidStateTransition, PanelError, UiError};
pub use layer::{Incoming, LayerId, LayerRegistry, UiLayer};
pub use manager::UiManager;
pub use panel::{AsAny, Panel, UiFrame, Update};

pub use rusty_ui_macros::UiConfig;
