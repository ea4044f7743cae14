//! Host-side plumbing: the frame clock and log capture.

pub mod log;
pub mod time;

pub use time::{ONE_FPS, SIXTY_FPS, Time};
