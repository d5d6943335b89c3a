// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Every section has a `Default`, so a partial `browscroll.toml` only needs the
//! keys it changes.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowscrollConfig {
    pub pacer: PacerSettings,
    pub tracking: TrackingSettings,
    pub sink: SinkSettings,
    pub logging: LoggingSettings,
}

/// Pacing engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerSettings {
    /// Rate at the hysteresis edge (ticks per second)
    pub min_rate: f64,
    /// Rate at full input (ticks per second)
    pub max_rate: f64,
    pub ease_power: f64,
    pub hysteresis: f64,
    pub max_ticks_per_flush: u32,
    pub flush_hz: f64,
    /// Amount treated as full input
    pub max_input: f64,
    /// Upper bound on carried-over ticks; unbounded when absent
    pub max_backlog_ticks: Option<f64>,
    pub stop_timeout_ms: u64,
}

impl Default for PacerSettings {
    fn default() -> Self {
        Self {
            min_rate: 4.0,
            max_rate: 40.0,
            ease_power: 2.2,
            hysteresis: 0.02,
            max_ticks_per_flush: 6,
            flush_hz: 50.0,
            max_input: 1.0,
            max_backlog_ticks: None,
            stop_timeout_ms: 1000,
        }
    }
}

/// Face tracking input (LiveLink UDP) and brow mixing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    pub bind_host: String,
    pub port: u16,
    pub scroll_threshold: f64,
    pub scroll_speed: f64,
    pub max_scroll: f64,
    /// Socket read timeout; bounds how long shutdown waits on the receiver
    pub recv_timeout_ms: u64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 11111,
            scroll_threshold: 0.15,
            scroll_speed: 1.0,
            max_scroll: 20.0,
            recv_timeout_ms: 100,
        }
    }
}

/// Output sink kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// In-process XTest wheel events on the X11 display
    #[default]
    Xtest,
    /// Mouse wheel clicks through the `xdotool` binary
    Xdotool,
    /// Dry run, batches are only logged
    Log,
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xtest" => Ok(SinkKind::Xtest),
            "xdotool" => Ok(SinkKind::Xdotool),
            "log" => Ok(SinkKind::Log),
            other => Err(format!("unknown sink kind '{}' (expected xtest, xdotool or log)", other)),
        }
    }
}

/// Event sink settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub kind: SinkKind,
    /// Swap wheel-up and wheel-down
    pub invert: bool,
    pub click_delay_ms: u64,
    /// X11 display name for the xtest sink (`DISPLAY` when unset)
    pub display: Option<String>,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            kind: SinkKind::Xtest,
            invert: false,
            click_delay_ms: 1,
            display: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormatSetting,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormatSetting::Text,
        }
    }
}
