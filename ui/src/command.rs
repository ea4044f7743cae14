//! Deferred navigation commands.
//!
//! Update hooks run while the dispatcher walks its index, so they cannot open or close panels
//! directly. Instead they push [`NavCommand`]s into a [`CommandBuffer`] through a [`Navigator`];
//! the manager applies the buffer once the dispatch pass has finished.
//!
//! ```text
//! ┌──────────────────── update(delta) ────────────────────┐
//! │  Panel A ──push──┐                                    │
//! │  Panel B ──push──┼──► CommandBuffer ──flush──► Manager│
//! │  Host    ──push──┘       (after the pass)             │
//! └───────────────────────────────────────────────────────┘
//! ```

use std::any::{TypeId, type_name};

use crossbeam::queue::SegQueue;

use crate::{context::OpenParams, panel::Panel};

/// A deferred navigation request.
pub enum NavCommand {
    /// Open the UI type identified by `type_id`.
    Open {
        type_id: TypeId,
        type_name: &'static str,
        params: OpenParams,
    },
    /// Close the UI registered under `key`.
    Close { key: String },
    /// Navigate back from the UI registered under `key`.
    Back { key: String },
}

impl std::fmt::Debug for NavCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavCommand::Open {
                type_name, params, ..
            } => write!(f, "Open({type_name}, {} params)", params.len()),
            NavCommand::Close { key } => write!(f, "Close({key})"),
            NavCommand::Back { key } => write!(f, "Back({key})"),
        }
    }
}

/// Lock-free queue of navigation commands.
///
/// `push` may be called from any thread; draining happens on the thread that owns the manager.
#[derive(Default)]
pub struct CommandBuffer {
    commands: SegQueue<NavCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            commands: SegQueue::new(),
        }
    }

    pub fn push(&self, command: NavCommand) {
        self.commands.push(command);
    }

    /// Drain all queued commands in FIFO order.
    pub fn drain(&self) -> Vec<NavCommand> {
        let mut drained = Vec::with_capacity(self.commands.len());
        while let Some(command) = self.commands.pop() {
            drained.push(command);
        }
        drained
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Handle used to queue navigation requests into a [`CommandBuffer`].
#[derive(Clone, Copy)]
pub struct Navigator<'a> {
    buffer: &'a CommandBuffer,
}

impl<'a> Navigator<'a> {
    pub fn new(buffer: &'a CommandBuffer) -> Self {
        Self { buffer }
    }

    /// Queue an open of `T` with the given parameters.
    pub fn open<T: Panel>(&self, params: OpenParams) {
        self.buffer.push(NavCommand::Open {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            params,
        });
    }

    pub fn close(&self, key: impl Into<String>) {
        self.buffer.push(NavCommand::Close { key: key.into() });
    }

    pub fn back(&self, key: impl Into<String>) {
        self.buffer.push(NavCommand::Back { key: key.into() });
    }
}
