//! Benchmark utilities for `rusty_ui`.
//!
//! - **Microbenchmarks**: single operations in isolation (open, reopen, back, dispatch)
//! - **Scenario benchmarks**: seeded random navigation over many panel types and layers
//! - **Frame timing**: per-frame cost of the dispatch pass in a simulated host loop
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench -p rusty_ui_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ui_bench -- dispatch
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports.

pub mod churn;
pub mod fixtures;
pub mod frame_timer;
