// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Engine lifecycle
//!
//! Runs the real loop thread against in-memory sinks: construction failures,
//! paced emission, sink failure containment and bounded shutdown.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use browscroll_pacer::{
    CallbackSink, Direction, EventSink, PacerConfig, PacerError, PacingEngine, SinkError,
};

/// Records every batch it receives
#[derive(Clone, Default)]
struct RecordingSink {
    batches: Arc<Mutex<Vec<(Direction, u32)>>>,
}

impl RecordingSink {
    fn total(&self, direction: Direction) -> u32 {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| *d == direction)
            .map(|(_, n)| n)
            .sum()
    }

    fn batch_sizes(&self) -> Vec<u32> {
        self.batches.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        self.batches.lock().unwrap().push((direction, count));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Refuses to acquire its resource
struct UnavailableSink;

impl EventSink for UnavailableSink {
    fn acquire(&mut self) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("no display".to_string()))
    }

    fn emit(&mut self, _direction: Direction, _count: u32) -> Result<(), SinkError> {
        unreachable!("emit must not be called when acquire failed")
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

fn fast_config() -> PacerConfig {
    PacerConfig {
        min_rate: 200.0,
        max_rate: 200.0,
        ease_power: 1.0,
        hysteresis: 0.02,
        max_ticks_per_flush: 3,
        flush_interval: Duration::from_millis(10),
        max_input: 1.0,
        ..PacerConfig::default()
    }
}

fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn test_construction_fails_when_sink_unavailable() {
    let result = PacingEngine::new(fast_config(), UnavailableSink);
    match result {
        Err(PacerError::Initialization { sink, source }) => {
            assert_eq!(sink, "unavailable");
            assert!(matches!(source, SinkError::Unavailable(_)));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("engine must not start without its sink"),
    }
}

#[test]
fn test_construction_rejects_invalid_config() {
    let config = PacerConfig {
        max_ticks_per_flush: 0,
        ..fast_config()
    };
    let result = PacingEngine::new(config, RecordingSink::default());
    assert!(matches!(result, Err(PacerError::InvalidConfig(_))));
}

#[test]
fn test_idle_engine_emits_nothing() {
    let sink = RecordingSink::default();
    let engine = PacingEngine::new(fast_config(), sink.clone()).unwrap();
    assert!(engine.is_running());

    thread::sleep(Duration::from_millis(80));
    engine.stop().unwrap();

    assert!(sink.batch_sizes().is_empty());
    assert!(engine.stats().cycles >= 1);
    assert!(!engine.is_running());
}

#[test]
fn test_emits_in_signal_direction_with_cap() {
    let sink = RecordingSink::default();
    let engine = PacingEngine::new(fast_config(), sink.clone()).unwrap();

    engine.set_amount(-0.8);
    assert!(wait_for(Duration::from_secs(2), || sink.total(Direction::Negative) >= 4));
    engine.stop().unwrap();

    assert_eq!(sink.total(Direction::Positive), 0);
    assert!(sink.batch_sizes().iter().all(|&n| (1..=3).contains(&n)));
    assert_eq!(u64::from(sink.total(Direction::Negative)), engine.stats().ticks_emitted);
}

#[test]
fn test_amount_handle_feeds_engine_from_another_thread() {
    let sink = RecordingSink::default();
    let engine = PacingEngine::new(fast_config(), sink.clone()).unwrap();
    let handle = engine.amount_handle();

    let producer = thread::spawn(move || {
        for _ in 0..20 {
            handle.set_amount(0.9);
            thread::sleep(Duration::from_millis(2));
        }
    });
    producer.join().unwrap();

    assert!(wait_for(Duration::from_secs(2), || sink.total(Direction::Positive) >= 1));
    engine.set_amount(0.0);
    engine.stop().unwrap();
}

#[test]
fn test_sink_failures_do_not_stop_pacing() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let sink = CallbackSink::new(move |_, _| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt % 2 == 1 {
            Err(SinkError::Command("injected failure".to_string()))
        } else {
            Ok(())
        }
    });

    let engine = PacingEngine::new(fast_config(), sink).unwrap();
    engine.set_amount(1.0);
    assert!(wait_for(Duration::from_secs(2), || attempts.load(Ordering::SeqCst) >= 6));
    engine.stop().unwrap();

    let stats = engine.stats();
    assert!(stats.emission_failures >= 3);
    assert!(stats.batches >= 2);
}

#[test]
fn test_failed_batches_are_spent() {
    // 200 ticks/s at 100 Hz is exactly 2 ticks per cycle, under the cap of 3
    let calls: Arc<Mutex<Vec<(u32, bool)>>> = Arc::default();
    let recorded = calls.clone();
    let sink = CallbackSink::new(move |_, count| {
        let mut calls = recorded.lock().unwrap();
        let fail = calls.len() < 5;
        calls.push((count, !fail));
        if fail {
            Err(SinkError::Unavailable("display gone".to_string()))
        } else {
            Ok(())
        }
    });

    let engine = PacingEngine::new(fast_config(), sink).unwrap();
    engine.set_amount(1.0);
    assert!(wait_for(Duration::from_secs(2), || calls.lock().unwrap().len() >= 10));
    engine.stop().unwrap();

    let calls = calls.lock().unwrap();
    let (failed, delivered): (Vec<&(u32, bool)>, Vec<&(u32, bool)>) = calls.iter().partition(|(_, ok)| !ok);
    assert_eq!(failed.len(), 5);
    assert!(delivered.len() >= 5);
    // No catch-up burst once the sink recovers
    assert!(
        calls.iter().all(|(count, _)| *count == 2),
        "batch sizes after outage: {:?}",
        calls.iter().map(|(n, _)| n).collect::<Vec<_>>()
    );
    assert_eq!(engine.stats().emission_failures, 5);
}

#[test]
fn test_panicking_sink_is_contained() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let sink = CallbackSink::new(move |_, _| -> Result<(), SinkError> {
        counter.fetch_add(1, Ordering::SeqCst);
        panic!("sink bug");
    });

    let engine = PacingEngine::new(fast_config(), sink).unwrap();
    engine.set_amount(1.0);
    assert!(wait_for(Duration::from_secs(2), || attempts.load(Ordering::SeqCst) >= 3));
    engine.stop().unwrap();
    assert!(engine.stats().emission_failures >= 3);
}

#[test]
fn test_stop_reports_timeout_for_stuck_sink() {
    let entered = Arc::new(AtomicBool::new(false));
    let flag = entered.clone();
    let sink = CallbackSink::new(move |_, _| {
        flag.store(true, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(400));
        Ok(())
    });

    let config = PacerConfig {
        stop_timeout: Duration::from_millis(50),
        ..fast_config()
    };
    let engine = PacingEngine::new(config, sink).unwrap();
    engine.set_amount(1.0);
    assert!(wait_for(Duration::from_secs(2), || entered.load(Ordering::SeqCst)));

    match engine.stop() {
        Err(PacerError::ShutdownTimeout { timeout }) => {
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("expected shutdown timeout, got {other:?}"),
    }

    // Subsequent stops are no-ops
    assert!(engine.stop().is_ok());
}

#[test]
fn test_stop_is_prompt_with_long_interval() {
    let config = PacerConfig {
        flush_interval: Duration::from_secs(2),
        ..fast_config()
    };
    let engine = PacingEngine::new(config, RecordingSink::default()).unwrap();

    let start = Instant::now();
    engine.stop().unwrap();
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn test_drop_stops_loop() {
    let sink = RecordingSink::default();
    {
        let engine = PacingEngine::new(fast_config(), sink.clone()).unwrap();
        engine.set_amount(1.0);
        assert!(wait_for(Duration::from_secs(2), || !sink.batch_sizes().is_empty()));
    }
    let settled = sink.batch_sizes().len();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(sink.batch_sizes().len(), settled);
}
