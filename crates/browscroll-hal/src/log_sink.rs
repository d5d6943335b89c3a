// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use browscroll_pacer::{Direction, EventSink, SinkError};
use tracing::info;

/// Logs each batch at `info` instead of injecting input
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    ticks: Arc<AtomicU64>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of ticks seen so far; stays readable after the sink
    /// moves into the engine.
    pub fn tick_counter(&self) -> Arc<AtomicU64> {
        self.ticks.clone()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        let total = self.ticks.fetch_add(u64::from(count), Ordering::Relaxed) + u64::from(count);
        let label = match direction {
            Direction::Positive => "up",
            Direction::Negative => "down",
        };
        info!("[DRY-RUN] scroll {} x{} (total {})", label, count, total);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
