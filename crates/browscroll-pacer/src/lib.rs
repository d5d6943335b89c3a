// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Browscroll Pacer
//!
//! Converts a continuously varying, signed control signal into a bounded stream
//! of discrete "tick" events handed to an [`EventSink`].
//!
//! ## Pipeline
//! ```text
//! producer ──set_amount──▶ SampleChannel ──read──▶ pacing loop (own thread)
//!                                                   │
//!                                   rate_for_amount ◀┘
//!                                                   │
//!                                       PacerState::advance
//!                                                   │
//!                                       EventSink::emit(direction, count)
//! ```
//!
//! ## Shaping
//! - Power-law ease curve between `min_rate` and `max_rate`
//! - Hysteresis dead zone around zero
//! - Direction debounce: a sign flip discards credit accrued the other way
//! - Fractional accumulation with a per-cycle burst cap; the excess carries forward
//!
//! ```rust,no_run
//! use browscroll_pacer::{CallbackSink, PacerConfig, PacingEngine};
//!
//! let sink = CallbackSink::new(|direction, count| {
//!     println!("{direction:?} x{count}");
//!     Ok(())
//! });
//! let engine = PacingEngine::new(PacerConfig::default(), sink)?;
//! engine.set_amount(0.6);
//! std::thread::sleep(std::time::Duration::from_millis(200));
//! engine.stop()?;
//! # Ok::<(), browscroll_pacer::PacerError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod engine;
pub mod error;
pub mod pacer_state;
pub mod pacing_loop_runner;
pub mod rate_curve;
pub mod sample_channel;
pub mod sink;
pub mod stats;

pub use config::PacerConfig;
pub use engine::PacingEngine;
pub use error::{PacerError, PacerResult, SinkError};
pub use pacer_state::{PacerPhase, PacerState, TickBatch};
pub use pacing_loop_runner::PacingLoopRunner;
pub use rate_curve::rate_for_amount;
pub use sample_channel::{AmountHandle, SampleChannel};
pub use sink::{CallbackSink, Direction, EventSink};
pub use stats::{PacerStats, PacerStatsSnapshot};
