// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # browscroll-hal
//!
//! Platform implementations of [`EventSink`]:
//! - [`XTestSink`]: X11 wheel events injected in-process through XTest
//! - [`XdotoolSink`]: X11 mouse wheel clicks through the `xdotool` binary
//! - [`LogSink`]: dry run, batches are only logged

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dry-run sink.
pub mod log_sink;
/// X11 wheel sink (subprocess).
pub mod xdotool;
/// X11 wheel sink (in-process).
pub mod xtest;

pub use log_sink::LogSink;
pub use xdotool::XdotoolSink;
pub use xtest::XTestSink;

use browscroll_config::{SinkKind, SinkSettings};
use browscroll_pacer::{Direction, EventSink};

/// X11 button for wheel up
pub const WHEEL_UP_BUTTON: u8 = 4;
/// X11 button for wheel down
pub const WHEEL_DOWN_BUTTON: u8 = 5;

/// Wheel button for `direction`; `invert` swaps up and down
pub fn wheel_button(direction: Direction, invert: bool) -> u8 {
    match (direction, invert) {
        (Direction::Positive, false) | (Direction::Negative, true) => WHEEL_UP_BUTTON,
        (Direction::Negative, false) | (Direction::Positive, true) => WHEEL_DOWN_BUTTON,
    }
}

/// Build the sink selected by `settings`
///
/// The sink is not acquired yet; the engine does that on construction.
pub fn build_sink(settings: &SinkSettings) -> Box<dyn EventSink> {
    match settings.kind {
        SinkKind::Xtest => Box::new(XTestSink::new(settings.display.clone(), settings.invert)),
        SinkKind::Xdotool => Box::new(XdotoolSink::new(settings.invert, settings.click_delay_ms)),
        SinkKind::Log => Box::new(LogSink::new()),
    }
}
