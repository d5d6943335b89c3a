// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pacer error types

use std::time::Duration;

/// Engine-level errors
#[derive(Debug, thiserror::Error)]
pub enum PacerError {
    #[error("Invalid pacer configuration: {0}")]
    InvalidConfig(String),

    /// The sink's resource could not be acquired, or the loop thread could not start
    #[error("Failed to initialize pacer with sink '{sink}': {source}")]
    Initialization {
        sink: String,
        #[source]
        source: SinkError,
    },

    /// `stop()` gave up waiting; the loop thread is considered leaked
    #[error("Pacing loop did not stop within {timeout:?}")]
    ShutdownTimeout { timeout: Duration },

    #[error("Pacing loop is already running")]
    AlreadyRunning,

    #[error("Pacing loop thread panicked")]
    LoopPanicked,
}

/// Failure reported by an event sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Sink resource unavailable: {0}")]
    Unavailable(String),

    #[error("Sink command failed: {0}")]
    Command(String),

    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink rejected emission: {0}")]
    Rejected(String),
}

pub type PacerResult<T> = Result<T, PacerError>;
