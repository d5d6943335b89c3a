// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pacing Loop Runner
//!
//! Runs the pacing control loop on a dedicated thread.
//!
//! ## Design
//! - One cycle per `flush_interval`, self-timed against a monotonic clock: each
//!   cycle sleeps only the shortfall since the previous cycle started
//! - A slow cycle (e.g. a slow sink) is followed immediately by the next one;
//!   there is no catch-up firing
//! - Shutdown is cooperative: the running flag is checked at cycle boundaries
//!   and between sleep chunks, never mid-emission
//! - Sink failures and panics are contained to the cycle they happen in

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::PacerConfig;
use crate::error::{PacerError, PacerResult, SinkError};
use crate::pacer_state::{PacerState, TickBatch};
use crate::sample_channel::SampleChannel;
use crate::sink::{Direction, EventSink};
use crate::stats::PacerStats;

/// Longest single sleep, so a stop request is seen within this bound
const MAX_SLEEP_CHUNK: Duration = Duration::from_millis(50);

/// Owns the pacing thread and its shutdown flag.
pub struct PacingLoopRunner {
    /// Running flag (atomic for thread-safe stop)
    running: Arc<AtomicBool>,
    /// Thread handle, taken by the first `stop()`
    thread_handle: Mutex<Option<thread::JoinHandle<()>>>,
    stats: Arc<PacerStats>,
}

impl Default for PacingLoopRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl PacingLoopRunner {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
            stats: Arc::new(PacerStats::new()),
        }
    }

    /// Start the loop thread.
    ///
    /// The sink must already be acquired; it moves onto the loop thread.
    pub fn start<S>(
        &self,
        config: PacerConfig,
        channel: Arc<SampleChannel>,
        sink: S,
    ) -> PacerResult<()>
    where
        S: EventSink + 'static,
    {
        let mut handle_slot = self.thread_handle.lock();
        if self.running.load(Ordering::Acquire) || handle_slot.is_some() {
            return Err(PacerError::AlreadyRunning);
        }

        let sink_name = sink.name().to_string();
        info!(
            "[PACER] Starting pacing loop at {:.1} Hz (sink '{}', cap {} ticks/flush)",
            config.flush_hz(),
            sink_name,
            config.max_ticks_per_flush
        );

        self.running.store(true, Ordering::Release);
        let running = self.running.clone();
        let stats = self.stats.clone();

        let spawned = thread::Builder::new()
            .name("browscroll-pacer".to_string())
            .spawn(move || pacing_loop(config, channel, sink, running, stats));

        match spawned {
            Ok(handle) => {
                *handle_slot = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(PacerError::Initialization {
                    sink: sink_name,
                    source: SinkError::Io(e),
                })
            }
        }
    }

    /// Stop the loop and wait up to `timeout` for the thread to exit.
    ///
    /// Calling this again after the loop has been stopped is a no-op.
    pub fn stop(&self, timeout: Duration) -> PacerResult<()> {
        self.running.store(false, Ordering::Release);

        let Some(handle) = self.thread_handle.lock().take() else {
            return Ok(());
        };

        info!("[PACER] Stopping pacing loop...");
        let start = Instant::now();

        // JoinHandle has no timed join; wait on a helper thread instead
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(handle.join());
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(())) => {
                info!("[PACER] Pacing loop stopped cleanly in {:?}", start.elapsed());
                Ok(())
            }
            Ok(Err(_)) => {
                warn!("[PACER] Pacing loop thread panicked");
                Err(PacerError::LoopPanicked)
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "[PACER] Pacing loop did not stop within {:?}; leaving it detached",
                    timeout
                );
                Err(PacerError::ShutdownTimeout { timeout })
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("[PACER] Join helper disconnected unexpectedly");
                Err(PacerError::LoopPanicked)
            }
        }
    }

    /// Whether the loop has been started and not yet asked to stop
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> Arc<PacerStats> {
        self.stats.clone()
    }
}

fn pacing_loop<S: EventSink>(
    config: PacerConfig,
    channel: Arc<SampleChannel>,
    mut sink: S,
    running: Arc<AtomicBool>,
    stats: Arc<PacerStats>,
) {
    let interval = config.flush_interval;
    let mut state = PacerState::new();
    let mut cycle_start = Instant::now();

    while running.load(Ordering::Acquire) {
        sleep_until(cycle_start + interval, &running);
        if !running.load(Ordering::Acquire) {
            break;
        }

        let now = Instant::now();
        let since_previous = now.duration_since(cycle_start);
        cycle_start = now;
        stats.record_cycle();

        let amount = channel.read();
        let previous_phase = state.phase();
        let batch = state.advance(amount, &config);
        if state.phase() != previous_phase {
            debug!(
                "[PACER] {:?} -> {:?} (amount {:.3})",
                previous_phase,
                state.phase(),
                amount
            );
        }

        if let Some(batch) = batch {
            emit_batch(&mut sink, batch, &stats);
        }

        let busy = cycle_start.elapsed();
        if busy > interval {
            stats.record_overrun();
            debug!(
                "[PACER] Cycle overran: {:.2}ms busy, {:.2}ms since previous cycle (target {:.2}ms)",
                busy.as_secs_f64() * 1000.0,
                since_previous.as_secs_f64() * 1000.0,
                interval.as_secs_f64() * 1000.0
            );
        }
    }

    let snapshot = stats.snapshot();
    info!(
        "[PACER] Pacing loop exited after {} cycles ({} ticks, {} failed emissions)",
        snapshot.cycles, snapshot.ticks_emitted, snapshot.emission_failures
    );
}

/// Sleep until `target` in bounded chunks, returning early on shutdown.
fn sleep_until(target: Instant, running: &AtomicBool) {
    loop {
        let now = Instant::now();
        if now >= target || !running.load(Ordering::Acquire) {
            return;
        }
        thread::sleep((target - now).min(MAX_SLEEP_CHUNK));
    }
}

/// Hand one batch to the sink. Errors and panics are logged, never propagated.
fn emit_batch<S: EventSink>(sink: &mut S, batch: TickBatch, stats: &PacerStats) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        sink.emit(batch.direction, batch.count)
    }));

    match outcome {
        Ok(Ok(())) => {
            stats.record_batch(batch.count);
            trace!("[PACER] Emitted {} x{}", direction_label(&batch), batch.count);
        }
        Ok(Err(e)) => {
            let failures = stats.record_failure();
            warn!(
                "[PACER] Sink '{}' failed to emit {} x{}: {} ({} failures so far)",
                sink.name(),
                direction_label(&batch),
                batch.count,
                e,
                failures
            );
        }
        Err(_) => {
            let failures = stats.record_failure();
            warn!(
                "[PACER] Sink '{}' panicked while emitting {} x{} ({} failures so far)",
                sink.name(),
                direction_label(&batch),
                batch.count,
                failures
            );
        }
    }
}

fn direction_label(batch: &TickBatch) -> &'static str {
    match batch.direction {
        Direction::Positive => "+",
        Direction::Negative => "-",
    }
}
