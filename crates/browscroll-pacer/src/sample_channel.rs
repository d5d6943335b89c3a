// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Last-value-wins handoff of the control signal between threads
//!
//! The sample is stored as the bit pattern of an `f64` inside an `AtomicU64`, so a
//! concurrent write can never produce a torn read and producers never block.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Single-slot cell holding the most recent signal sample.
#[derive(Debug)]
pub struct SampleChannel {
    bits: AtomicU64,
}

impl Default for SampleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleChannel {
    /// Create a channel holding 0.0 (neutral).
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Overwrite the current sample. NaN is stored as 0.0.
    pub fn set(&self, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value };
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Most recent sample (0.0 if never set).
    pub fn read(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Cloneable producer-side handle to an engine's [`SampleChannel`].
///
/// Signal sources hold one of these instead of the engine itself.
#[derive(Debug, Clone)]
pub struct AmountHandle {
    channel: Arc<SampleChannel>,
}

impl AmountHandle {
    pub(crate) fn new(channel: Arc<SampleChannel>) -> Self {
        Self { channel }
    }

    /// Publish a new signal sample. Never blocks.
    pub fn set_amount(&self, value: f64) {
        self.channel.set(value);
    }

    /// Last published sample.
    pub fn amount(&self) -> f64 {
        self.channel.read()
    }
}
