// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # browscroll
//!
//! Eyebrow-driven smooth scrolling. LiveLink Face frames arrive over UDP, the
//! brow channels are mixed into a signed amount, and the pacing engine turns
//! that amount into evenly spaced mouse wheel ticks.
//!
//! ```text
//! LiveLinkReceiver ─► BrowMixer ─► PacingEngine ─► EventSink (xtest / xdotool / log)
//! ```
//!
//! ## Crates
//! - [`pacer`]: the pacing engine, usable on its own with any [`pacer::EventSink`]
//! - [`livelink`]: packet decoding, brow mixing, UDP receiver
//! - [`hal`]: platform sinks
//! - [`config`]: `browscroll.toml` loading
//! - [`observability`]: logging setup
//!
//! ## Example
//!
//! ```rust,no_run
//! use browscroll::prelude::*;
//!
//! let config = load_config_or_default(None, None)?;
//! let engine = PacingEngine::new(pacer_config_from_settings(&config.pacer), LogSink::new())?;
//! engine.set_amount(0.4);
//! engine.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::trace;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use browscroll_config as config;
pub use browscroll_hal as hal;
pub use browscroll_livelink as livelink;
pub use browscroll_observability as observability;
pub use browscroll_pacer as pacer;

use config::{LogFormatSetting, LoggingSettings, PacerSettings, TrackingSettings};
use livelink::{BrowMixer, LiveLinkReceiver, PacketResult};
use observability::{LogFormat, LoggingConfig};
use pacer::{AmountHandle, PacerConfig};

/// Convert the `[pacer]` section into an engine configuration
pub fn pacer_config_from_settings(settings: &PacerSettings) -> PacerConfig {
    PacerConfig {
        min_rate: settings.min_rate,
        max_rate: settings.max_rate,
        ease_power: settings.ease_power,
        hysteresis: settings.hysteresis,
        max_ticks_per_flush: settings.max_ticks_per_flush,
        max_input: settings.max_input,
        stop_timeout: Duration::from_millis(settings.stop_timeout_ms),
        ..PacerConfig::default()
    }
    .with_flush_hz(settings.flush_hz)
    .with_max_backlog_ticks(settings.max_backlog_ticks)
}

pub fn brow_mixer_from_settings(settings: &TrackingSettings) -> BrowMixer {
    BrowMixer::new(
        settings.scroll_threshold,
        settings.scroll_speed,
        settings.max_scroll,
    )
}

pub fn logging_config_from_settings(settings: &LoggingSettings) -> LoggingConfig {
    LoggingConfig {
        level: settings.level.clone(),
        format: match settings.format {
            LogFormatSetting::Text => LogFormat::Text,
            LogFormatSetting::Json => LogFormat::Json,
        },
    }
}

/// Feed mixed brow amounts into the engine until `running` is cleared
///
/// Every frame is forwarded, including zero amounts, so relaxed brows stop
/// scrolling. Returns the number of frames processed.
pub fn run_tracking(
    receiver: &mut LiveLinkReceiver,
    mixer: &BrowMixer,
    amount: &AmountHandle,
    running: &AtomicBool,
) -> PacketResult<u64> {
    receiver.run(running, |frame| {
        let reading = mixer.mix(frame);
        trace!(
            "[TRACKING] {} up={:.2} down={:.2} amount={:.3}",
            frame.subject_name,
            reading.brow_up,
            reading.brow_down,
            reading.amount
        );
        amount.set_amount(reading.amount);
    })
}

/// Common imports
pub mod prelude {
    pub use crate::config::{
        load_config, load_config_or_default, validate_config, BrowscrollConfig, SinkKind,
    };
    pub use crate::hal::{build_sink, LogSink, XTestSink, XdotoolSink};
    pub use crate::livelink::{BrowMixer, FaceBlendShape, LiveLinkFrame, LiveLinkReceiver};
    pub use crate::pacer::{
        Direction, EventSink, PacerConfig, PacerError, PacingEngine, SinkError,
    };
    pub use crate::{brow_mixer_from_settings, pacer_config_from_settings, run_tracking};
}
