// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-process X11 wheel events through the XTest extension
//!
//! The display connection is opened once in `acquire()` and kept for the life
//! of the sink. Each batch is `count` press/release pairs followed by a single
//! round trip, so injection errors surface on the batch that caused them.

use browscroll_pacer::{Direction, EventSink, SinkError};
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ConnectionExt as _, Window, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT,
};
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;

use crate::wheel_button;

/// Open display plus the root window events are sent to
struct XDisplay {
    conn: RustConnection,
    root: Window,
}

pub struct XTestSink {
    display_name: Option<String>,
    invert: bool,
    display: Option<XDisplay>,
}

impl XTestSink {
    /// Sink for `display_name`, or `DISPLAY` when `None`
    pub fn new(display_name: Option<String>, invert: bool) -> Self {
        Self {
            display_name,
            invert,
            display: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.display.is_some()
    }

    fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("$DISPLAY")
    }

    fn connect(&self) -> Result<XDisplay, SinkError> {
        let (conn, screen) = x11rb::connect(self.display_name.as_deref()).map_err(|e| {
            SinkError::Unavailable(format!("cannot open display {}: {}", self.display_label(), e))
        })?;

        let root = conn
            .setup()
            .roots
            .get(screen)
            .map(|s| s.root)
            .ok_or_else(|| SinkError::Unavailable(format!("display has no screen {}", screen)))?;

        // Round trip: fails here if the server lacks XTest
        let version = conn
            .xtest_get_version(2, 2)
            .map_err(|e| SinkError::Unavailable(format!("XTest request failed: {}", e)))?
            .reply()
            .map_err(|e| SinkError::Unavailable(format!("XTest not available: {}", e)))?;

        info!(
            "[HAL] XTest {}.{} on display {} (screen {})",
            version.major_version,
            version.minor_version,
            self.display_label(),
            screen
        );
        Ok(XDisplay { conn, root })
    }
}

fn injection_error(e: impl std::fmt::Display) -> SinkError {
    SinkError::Command(format!("XTest: {}", e))
}

impl EventSink for XTestSink {
    fn acquire(&mut self) -> Result<(), SinkError> {
        if self.display.is_none() {
            self.display = Some(self.connect()?);
        }
        Ok(())
    }

    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        let button = wheel_button(direction, self.invert);
        let display = self
            .display
            .as_ref()
            .ok_or_else(|| SinkError::Unavailable("display not acquired".to_string()))?;

        for _ in 0..count {
            for event in [BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT] {
                display
                    .conn
                    .xtest_fake_input(event, button, x11rb::CURRENT_TIME, display.root, 0, 0, 0)
                    .map_err(injection_error)?;
            }
        }

        // One sync per batch
        display
            .conn
            .get_input_focus()
            .map_err(injection_error)?
            .reply()
            .map_err(injection_error)?;

        debug!("[HAL] XTest button {} x{}", button, count);
        Ok(())
    }

    fn name(&self) -> &str {
        "xtest"
    }
}
