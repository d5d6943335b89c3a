// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # browscroll-observability
//!
//! Logging initialization for browscroll binaries, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: JSON log file per run with retention-based cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known browscroll crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "browscroll",
    "browscroll-pacer",
    "browscroll-hal",
    "browscroll-livelink",
    "browscroll-config",
];
