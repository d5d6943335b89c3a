// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Packet decoding and receive errors
#[derive(Debug, Error)]
pub enum PacketError {
    #[error("Packet truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("Packet carries no frame data")]
    NoFrameData,

    #[error("Invalid {field} length: {length}")]
    InvalidLength { field: &'static str, length: i32 },

    #[error("Unexpected blend shape count: expected {expected}, got {actual}")]
    BlendShapeCount { expected: usize, actual: usize },

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PacketResult<T> = Result<T, PacketError>;
