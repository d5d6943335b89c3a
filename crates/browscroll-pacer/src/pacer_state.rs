// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Control-loop state: fractional tick accumulator and committed direction
//!
//! Owned by the pacing loop thread. [`PacerState::advance`] is the whole
//! per-cycle transition and is deterministic, so it is exercised directly by
//! tests and benchmarks without a thread or a clock.

use crate::config::PacerConfig;
use crate::rate_curve::rate_for_amount;
use crate::sink::Direction;

/// Accumulators within this distance below an integer count as reaching it.
///
/// Repeated `rate * dt` additions drift by a few ULPs; without this a credit
/// that is exactly integral on paper can sit at `0.999...` for a cycle.
const TICK_EPSILON: f64 = 1e-9;

/// Tick batch due in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBatch {
    pub direction: Direction,
    pub count: u32,
}

/// Observable control-loop phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerPhase {
    /// Inside the dead zone: no credit, no direction
    Idle,
    /// Accruing credit in a committed direction
    Tracking(Direction),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacerState {
    accumulator: f64,
    direction: Option<Direction>,
}

impl PacerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fractional tick credit carried into the next cycle
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Direction of the last non-zero rate, if any
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn phase(&self) -> PacerPhase {
        match self.direction {
            Some(direction) => PacerPhase::Tracking(direction),
            None => PacerPhase::Idle,
        }
    }

    /// Drop all credit and forget the direction.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.direction = None;
    }

    /// Run one cycle for `amount`, returning the batch to hand to the sink.
    pub fn advance(&mut self, amount: f64, config: &PacerConfig) -> Option<TickBatch> {
        let rate = rate_for_amount(amount, config);
        if rate <= 0.0 {
            self.reset();
            return None;
        }

        // rate > 0 implies |amount| >= hysteresis, but a zero dead zone lets
        // 0.0 through with a positive min_rate; it has no sign to commit to.
        let Some(sign) = Direction::of(amount) else {
            self.reset();
            return None;
        };

        if self.direction != Some(sign) {
            // Credit accrued the other way must not fire after a reversal
            self.accumulator = 0.0;
            self.direction = Some(sign);
        }

        self.accumulator += rate * config.flush_interval_secs();

        let whole = (self.accumulator + TICK_EPSILON).floor();
        if whole < 1.0 {
            return None;
        }

        let emitted = whole.min(f64::from(config.max_ticks_per_flush)) as u32;
        // Anything beyond the cap stays in the accumulator for later cycles
        self.accumulator = (self.accumulator - f64::from(emitted)).max(0.0);
        if let Some(limit) = config.max_backlog_ticks {
            self.accumulator = self.accumulator.min(limit);
        }

        Some(TickBatch {
            direction: sign,
            count: emitted,
        })
    }
}
