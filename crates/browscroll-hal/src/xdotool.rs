// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! X11 wheel clicks through `xdotool`
//!
//! One process per batch: `xdotool click --repeat N --delay D B`, where button 4
//! is wheel up and 5 is wheel down. Spawns a process per batch; the xtest
//! sink avoids that and is the default.

use std::env;
use std::process::{Command, Stdio};

use browscroll_pacer::{Direction, EventSink, SinkError};
use tracing::{debug, info};

use crate::wheel_button;

#[derive(Debug, Clone)]
pub struct XdotoolSink {
    program: String,
    invert: bool,
    click_delay_ms: u64,
    require_display: bool,
}

impl XdotoolSink {
    pub fn new(invert: bool, click_delay_ms: u64) -> Self {
        Self {
            program: "xdotool".to_string(),
            invert,
            click_delay_ms,
            require_display: true,
        }
    }

    /// Use another executable with the same command line
    pub fn with_program(mut self, program: impl Into<String>, require_display: bool) -> Self {
        self.program = program.into();
        self.require_display = require_display;
        self
    }

    /// X11 button for `direction`, honouring `invert`
    pub fn button_for(&self, direction: Direction) -> u8 {
        wheel_button(direction, self.invert)
    }

    /// Arguments for one batch
    pub fn click_args(&self, direction: Direction, count: u32) -> Vec<String> {
        vec![
            "click".to_string(),
            "--repeat".to_string(),
            count.to_string(),
            "--delay".to_string(),
            self.click_delay_ms.to_string(),
            self.button_for(direction).to_string(),
        ]
    }
}

impl EventSink for XdotoolSink {
    fn acquire(&mut self) -> Result<(), SinkError> {
        if self.require_display && env::var_os("DISPLAY").map_or(true, |d| d.is_empty()) {
            return Err(SinkError::Unavailable(
                "DISPLAY is not set; an X11 session is required".to_string(),
            ));
        }

        let output = Command::new(&self.program)
            .arg("version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SinkError::Unavailable(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SinkError::Unavailable(format!(
                "{} version exited with {}",
                self.program, output.status
            )));
        }

        info!(
            "[HAL] Using {} ({})",
            self.program,
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }

    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        let args = self.click_args(direction, count);
        debug!("[HAL] {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SinkError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    fn name(&self) -> &str {
        "xdotool"
    }
}
