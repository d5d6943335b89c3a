// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pacing engine: owns the configuration, sample channel and loop thread

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::PacerConfig;
use crate::error::{PacerError, PacerResult};
use crate::pacing_loop_runner::PacingLoopRunner;
use crate::sample_channel::{AmountHandle, SampleChannel};
use crate::sink::EventSink;
use crate::stats::{PacerStats, PacerStatsSnapshot};

/// Composition root for one paced output.
///
/// The surrounding application builds the engine once, keeps it, and hands
/// [`AmountHandle`]s to whatever produces the signal.
pub struct PacingEngine {
    config: PacerConfig,
    channel: Arc<SampleChannel>,
    runner: PacingLoopRunner,
    stats: Arc<PacerStats>,
}

impl PacingEngine {
    /// Validate `config`, acquire the sink and start the loop thread.
    ///
    /// # Errors
    /// - [`PacerError::InvalidConfig`] if a field is out of range
    /// - [`PacerError::Initialization`] if the sink cannot acquire its resource
    ///   or the loop thread cannot be spawned
    pub fn new<S>(config: PacerConfig, mut sink: S) -> PacerResult<Self>
    where
        S: EventSink + 'static,
    {
        config.validate()?;

        sink.acquire().map_err(|source| PacerError::Initialization {
            sink: sink.name().to_string(),
            source,
        })?;

        let channel = Arc::new(SampleChannel::new());
        let runner = PacingLoopRunner::new();
        runner.start(config.clone(), channel.clone(), sink)?;
        let stats = runner.stats();

        Ok(Self {
            config,
            channel,
            runner,
            stats,
        })
    }

    /// Publish the latest signal sample. Never blocks, never fails.
    pub fn set_amount(&self, value: f64) {
        self.channel.set(value);
    }

    /// Producer handle sharing this engine's sample channel
    pub fn amount_handle(&self) -> AmountHandle {
        AmountHandle::new(self.channel.clone())
    }

    /// Stop the loop, waiting at most `config.stop_timeout`.
    ///
    /// # Errors
    /// [`PacerError::ShutdownTimeout`] when the loop did not exit in time (it is
    /// left detached), [`PacerError::LoopPanicked`] if it died.
    pub fn stop(&self) -> PacerResult<()> {
        let result = self.runner.stop(self.config.stop_timeout);
        if result.is_ok() {
            let snapshot = self.stats.snapshot();
            info!(
                "[PACER] Engine stopped: {} cycles, {} batches, {} ticks, {} failures, {} overruns",
                snapshot.cycles,
                snapshot.batches,
                snapshot.ticks_emitted,
                snapshot.emission_failures,
                snapshot.overruns
            );
        }
        result
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_running()
    }

    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// Lock-free copy of the loop counters
    pub fn stats(&self) -> PacerStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for PacingEngine {
    fn drop(&mut self) {
        if let Err(e) = self.runner.stop(self.config.stop_timeout) {
            warn!("[PACER] Engine dropped without a clean stop: {}", e);
        }
    }
}
