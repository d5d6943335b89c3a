// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Lock-free pacing loop counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters written by the loop thread and read from anywhere.
#[derive(Debug, Default)]
pub struct PacerStats {
    cycles: AtomicU64,
    batches: AtomicU64,
    ticks_emitted: AtomicU64,
    emission_failures: AtomicU64,
    overruns: AtomicU64,
}

/// Point-in-time copy of [`PacerStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacerStatsSnapshot {
    /// Loop iterations executed
    pub cycles: u64,
    /// Successful sink calls
    pub batches: u64,
    /// Ticks delivered by successful sink calls
    pub ticks_emitted: u64,
    /// Sink calls that returned an error or panicked
    pub emission_failures: u64,
    /// Cycles that took longer than the flush interval
    pub overruns: u64,
}

impl PacerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_batch(&self, count: u32) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.ticks_emitted.fetch_add(u64::from(count), Ordering::Relaxed);
    }

    /// Returns the failure count including this one.
    pub(crate) fn record_failure(&self) -> u64 {
        self.emission_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_overrun(&self) {
        self.overruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PacerStatsSnapshot {
        PacerStatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            ticks_emitted: self.ticks_emitted.load(Ordering::Relaxed),
            emission_failures: self.emission_failures.load(Ordering::Relaxed),
            overruns: self.overruns.load(Ordering::Relaxed),
        }
    }
}
