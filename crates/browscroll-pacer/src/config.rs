// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pacer configuration (immutable once an engine is built)

use std::time::Duration;

use crate::error::{PacerError, PacerResult};

/// Shaping and scheduling parameters for the pacing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PacerConfig {
    /// Ticks/sec just past the dead zone
    pub min_rate: f64,
    /// Ticks/sec at saturating input
    pub max_rate: f64,
    /// Curve exponent (>1 = gentler near zero)
    pub ease_power: f64,
    /// Dead-zone radius in input units
    pub hysteresis: f64,
    /// Hard cap on ticks handed to the sink in one cycle
    pub max_ticks_per_flush: u32,
    /// Target period between cycles
    pub flush_interval: Duration,
    /// Input magnitude that maps to `max_rate`
    pub max_input: f64,
    /// Optional ceiling on retained backlog (None = unbounded)
    pub max_backlog_ticks: Option<f64>,
    /// How long `stop()` waits for the loop thread
    pub stop_timeout: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            min_rate: 4.0,
            max_rate: 40.0,
            ease_power: 2.2,
            hysteresis: 0.02,
            max_ticks_per_flush: 6,
            flush_interval: Duration::from_millis(20), // 50 Hz
            max_input: 1.0,
            max_backlog_ticks: None,
            stop_timeout: Duration::from_secs(1),
        }
    }
}

impl PacerConfig {
    /// Set the flush period from a frequency in Hz.
    ///
    /// Non-positive or non-finite frequencies produce a zero interval, which
    /// [`PacerConfig::validate`] rejects.
    pub fn with_flush_hz(mut self, flush_hz: f64) -> Self {
        self.flush_interval = if flush_hz.is_finite() && flush_hz > 0.0 {
            // Whole nanoseconds so common rates (50 Hz -> 20 ms) are exact
            Duration::from_nanos((1e9 / flush_hz).round() as u64)
        } else {
            Duration::ZERO
        };
        self
    }

    pub fn with_max_backlog_ticks(mut self, max_backlog_ticks: Option<f64>) -> Self {
        self.max_backlog_ticks = max_backlog_ticks;
        self
    }

    /// Flush period in seconds, as used by the accumulator.
    pub fn flush_interval_secs(&self) -> f64 {
        self.flush_interval.as_secs_f64()
    }

    /// Flush frequency in Hz.
    pub fn flush_hz(&self) -> f64 {
        1.0 / self.flush_interval_secs()
    }

    /// Check every field constraint, reporting all violations at once.
    pub fn validate(&self) -> PacerResult<()> {
        let mut problems: Vec<String> = Vec::new();

        let finite = [
            ("min_rate", self.min_rate),
            ("max_rate", self.max_rate),
            ("ease_power", self.ease_power),
            ("hysteresis", self.hysteresis),
            ("max_input", self.max_input),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                problems.push(format!("{name} must be finite (got {value})"));
            }
        }

        if self.min_rate < 0.0 {
            problems.push(format!("min_rate must be >= 0 (got {})", self.min_rate));
        }
        if self.max_rate < self.min_rate {
            problems.push(format!(
                "max_rate ({}) must be >= min_rate ({})",
                self.max_rate, self.min_rate
            ));
        }
        if self.ease_power <= 0.0 {
            problems.push(format!("ease_power must be > 0 (got {})", self.ease_power));
        }
        if self.hysteresis < 0.0 {
            problems.push(format!("hysteresis must be >= 0 (got {})", self.hysteresis));
        }
        if self.max_ticks_per_flush == 0 {
            problems.push("max_ticks_per_flush must be >= 1".to_string());
        }
        if self.flush_interval.is_zero() {
            problems.push("flush_interval must be > 0".to_string());
        }
        if self.max_input <= 0.0 {
            problems.push(format!("max_input must be > 0 (got {})", self.max_input));
        }
        if let Some(limit) = self.max_backlog_ticks {
            if !limit.is_finite() || limit < f64::from(self.max_ticks_per_flush) {
                problems.push(format!(
                    "max_backlog_ticks ({limit}) must be finite and >= max_ticks_per_flush ({})",
                    self.max_ticks_per_flush
                ));
            }
        }
        if self.stop_timeout.is_zero() {
            problems.push("stop_timeout must be > 0".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PacerError::InvalidConfig(problems.join("; ")))
        }
    }
}
