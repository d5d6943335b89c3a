// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Tracking pipeline
//!
//! Real UDP datagrams through the receiver, the brow mixer and the pacing
//! engine into an in-memory sink.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use browscroll::prelude::*;
use browscroll::config::{PacerSettings, TrackingSettings};

type Batches = Arc<Mutex<Vec<(Direction, u32)>>>;

// ═══════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════

fn recording_engine(settings: &PacerSettings) -> (PacingEngine, Batches) {
    let batches: Batches = Arc::default();
    let recorded = batches.clone();
    let sink = browscroll::pacer::CallbackSink::new(move |direction, count| {
        recorded.lock().unwrap().push((direction, count));
        Ok(())
    });
    let engine = PacingEngine::new(pacer_config_from_settings(settings), sink).unwrap();
    (engine, batches)
}

fn brow_frame(up: f32, down: f32) -> Vec<u8> {
    let mut frame = LiveLinkFrame::new("test-device", "test-face");
    frame.set_blend_shape(FaceBlendShape::BrowInnerUp, up);
    frame.set_blend_shape(FaceBlendShape::BrowOuterUpLeft, up);
    frame.set_blend_shape(FaceBlendShape::BrowOuterUpRight, up);
    frame.set_blend_shape(FaceBlendShape::BrowDownLeft, down);
    frame.set_blend_shape(FaceBlendShape::BrowDownRight, down);
    frame.encode()
}

/// Send `frame` every 10 ms for `duration`
fn stream(target: SocketAddr, frame: &[u8], duration: Duration) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let start = Instant::now();
    while start.elapsed() < duration {
        socket.send_to(frame, target).unwrap();
        thread::sleep(Duration::from_millis(10));
    }
}

fn total(batches: &Batches, direction: Direction) -> u32 {
    batches
        .lock()
        .unwrap()
        .iter()
        .filter(|(d, _)| *d == direction)
        .map(|(_, n)| n)
        .sum()
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[test]
fn test_raised_then_relaxed_brows() {
    let tracking = TrackingSettings {
        bind_host: "127.0.0.1".to_string(),
        port: 0,
        recv_timeout_ms: 20,
        ..TrackingSettings::default()
    };
    let pacer = PacerSettings {
        flush_hz: 100.0,
        ..PacerSettings::default()
    };

    let (engine, batches) = recording_engine(&pacer);
    let mut receiver =
        LiveLinkReceiver::bind(&tracking.bind_host, tracking.port, Duration::from_millis(20))
            .unwrap();
    let target = receiver.local_addr().unwrap();
    let mixer = brow_mixer_from_settings(&tracking);
    let handle = engine.amount_handle();
    let running = Arc::new(AtomicBool::new(true));

    let receiver_running = running.clone();
    let receiver_thread =
        thread::spawn(move || run_tracking(&mut receiver, &mixer, &handle, &receiver_running));

    // Fully raised brows: amount 0.85, well above the dead zone
    stream(target, &brow_frame(1.0, 0.0), Duration::from_millis(400));
    let raised = total(&batches, Direction::Positive);

    // Relaxed brows must stop scrolling
    stream(target, &brow_frame(0.05, 0.05), Duration::from_millis(100));
    let settled = batches.lock().unwrap().len();
    stream(target, &brow_frame(0.05, 0.05), Duration::from_millis(150));
    let after_relax = batches.lock().unwrap().len();

    running.store(false, Ordering::Release);
    let frames = receiver_thread.join().unwrap().unwrap();
    engine.stop().unwrap();

    assert!(raised >= 2, "expected upward ticks, got {raised}");
    assert_eq!(total(&batches, Direction::Negative), 0);
    assert_eq!(after_relax, settled);
    assert!(frames > 0);
}

#[test]
fn test_lowered_brows_scroll_down() {
    let pacer = PacerSettings {
        flush_hz: 100.0,
        ..PacerSettings::default()
    };
    let (engine, batches) = recording_engine(&pacer);
    let mut receiver =
        LiveLinkReceiver::bind("127.0.0.1", 0, Duration::from_millis(20)).unwrap();
    let target = receiver.local_addr().unwrap();
    let mixer = BrowMixer::default();
    let handle = engine.amount_handle();
    let running = Arc::new(AtomicBool::new(true));

    let receiver_running = running.clone();
    let receiver_thread =
        thread::spawn(move || run_tracking(&mut receiver, &mixer, &handle, &receiver_running));

    stream(target, &brow_frame(0.0, 1.0), Duration::from_millis(400));

    running.store(false, Ordering::Release);
    receiver_thread.join().unwrap().unwrap();
    engine.stop().unwrap();

    assert!(total(&batches, Direction::Negative) >= 2);
    assert_eq!(total(&batches, Direction::Positive), 0);
}
