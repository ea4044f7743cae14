//! Per-frame dispatch.
//!
//! The [`Dispatcher`] keeps a weak index of contexts whose instance exposed the update
//! capability when it was attached. It stores ids only; contexts are owned by their layers and
//! the index never keeps one alive. Each tick it walks a snapshot of that index and drives the
//! contexts that are currently [`State::Showing`]. A failing hook is logged and recorded in the
//! [`DispatchReport`]; the remaining contexts still update in the same tick.

use std::{collections::BTreeMap, time::Duration};

use crate::{
    command::{CommandBuffer, Navigator},
    context::{ContextId, State},
    layer::{LayerId, LayerRegistry},
};

/// Summary of one dispatch pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Hooks that ran and succeeded.
    pub updated: usize,
    /// Indexed contexts that were not showing this tick.
    pub skipped: usize,
    /// Key and error message of every hook that failed.
    pub failed: Vec<(String, String)>,
}

impl DispatchReport {
    /// Whether every hook that ran succeeded.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Index of updatable contexts, in registration order.
#[derive(Debug, Default)]
pub struct Dispatcher {
    entries: BTreeMap<ContextId, LayerId>,
}

impl Dispatcher {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Index `id` on `layer`. Returns `false` if it was already indexed.
    pub fn register(&mut self, id: ContextId, layer: LayerId) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, layer);
        true
    }

    /// Drop `id` from the index. Returns whether it was indexed.
    pub fn remove(&mut self, id: ContextId) -> bool {
        self.entries.remove(&id).is_some()
    }

    #[inline]
    pub fn contains(&self, id: ContextId) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A stable copy of the index to iterate while hooks run.
    pub fn snapshot(&self) -> Vec<(ContextId, LayerId)> {
        self.entries.iter().map(|(id, layer)| (*id, *layer)).collect()
    }

    /// Run one pass over the index. Navigation requested by hooks lands in `commands`.
    pub fn dispatch(
        &self,
        layers: &mut LayerRegistry,
        commands: &CommandBuffer,
        delta: Duration,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (id, layer) in self.snapshot() {
            let Some(context) = layers.get_mut(layer).and_then(|layer| layer.context_mut(id))
            else {
                report.skipped += 1;
                continue;
            };
            if context.state() != State::Showing {
                report.skipped += 1;
                continue;
            }

            match context.update(delta, Navigator::new(commands)) {
                Some(Ok(())) => report.updated += 1,
                Some(Err(err)) => {
                    log::error!("update of ui '{}' failed: {err}", context.key());
                    report.failed.push((context.key().to_owned(), err.to_string()));
                }
                None => report.skipped += 1,
            }
        }

        report
    }
}
