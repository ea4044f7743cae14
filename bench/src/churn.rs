//! Seeded random navigation scripts.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ui::{AssetProvider, OpenParams, UiManager};

use crate::fixtures::SlotType;

/// One navigation request in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open(usize),
    Close(usize),
    Back(usize),
    Frame,
}

/// Relative weights of the steps a script is generated from.
#[derive(Debug, Clone, Copy)]
pub struct Mix {
    pub open: u32,
    pub close: u32,
    pub back: u32,
    pub frame: u32,
}

impl Default for Mix {
    fn default() -> Self {
        Self {
            open: 4,
            close: 1,
            back: 2,
            frame: 3,
        }
    }
}

/// Generate `len` steps over `slots` panel types, reproducible for a given `seed`.
pub fn script(seed: u64, len: usize, slots: usize, mix: Mix) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let total = mix.open + mix.close + mix.back + mix.frame;
    (0..len)
        .map(|_| {
            let slot = rng.gen_range(0..slots);
            let roll = rng.gen_range(0..total);
            if roll < mix.open {
                Step::Open(slot)
            } else if roll < mix.open + mix.close {
                Step::Close(slot)
            } else if roll < mix.open + mix.close + mix.back {
                Step::Back(slot)
            } else {
                Step::Frame
            }
        })
        .collect()
}

/// Counters from replaying a script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    pub opened: usize,
    pub released: usize,
    pub ignored: usize,
    pub updates: usize,
}

/// Apply `steps` to `ui`, advancing `delta` on every [`Step::Frame`].
pub fn replay<A: AssetProvider>(
    ui: &mut UiManager<A>,
    slots: &[SlotType],
    steps: &[Step],
    delta: Duration,
) -> Replay {
    let mut replay = Replay::default();
    for step in steps {
        match *step {
            Step::Open(n) => {
                let slot = slots[n];
                if ui
                    .open_type(slot.type_id, slot.type_name, OpenParams::new())
                    .is_ok()
                {
                    replay.opened += 1;
                }
            }
            Step::Close(n) => {
                if ui.close(slots[n].asset_key) {
                    replay.released += 1;
                } else {
                    replay.ignored += 1;
                }
            }
            Step::Back(n) => {
                if ui.back(slots[n].asset_key) {
                    replay.released += 1;
                } else {
                    replay.ignored += 1;
                }
            }
            Step::Frame => replay.updates += ui.update(delta).updated,
        }
    }
    replay
}
