// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Magnitude → emission rate mapping

use crate::config::PacerConfig;

/// Map a signed input sample to a tick rate (ticks/sec).
///
/// Inside the dead zone (`|amount| < hysteresis`) the rate is zero. Beyond it the
/// magnitude is normalized by `max_input`, clamped to 1.0, eased with
/// `ease_power` and interpolated between `min_rate` and `max_rate`.
pub fn rate_for_amount(amount: f64, config: &PacerConfig) -> f64 {
    let magnitude = amount.abs();
    if magnitude.is_nan() || magnitude < config.hysteresis {
        return 0.0;
    }
    let normalized = (magnitude / config.max_input).min(1.0);
    let eased = normalized.powf(config.ease_power);
    config.min_rate + (config.max_rate - config.min_rate) * eased
}
