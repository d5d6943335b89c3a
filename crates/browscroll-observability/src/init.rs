// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console logging is always available. With the `file-logging` feature a JSON
//! log is also written into a timestamped run folder, and old runs are pruned.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

fn build_filter(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string(&config.level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter directives: {}", directives))
}

/// Initialize console-only logging
///
/// Fails if the level is not a valid filter directive or a global subscriber
/// is already installed.
pub fn init_console_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(debug_flags, config)?;

    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(debug_flags.any_enabled())
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default()
        .with(console_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(())
}

#[cfg(feature = "file-logging")]
pub use file_logging::*;

#[cfg(feature = "file-logging")]
mod file_logging {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use chrono::{Local, NaiveDateTime};
    use tracing_appender::rolling;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, Registry};

    use super::build_filter;
    use crate::cli::CrateDebugFlags;
    use crate::config::LoggingConfig;

    const RUN_PREFIX: &str = "run_";
    const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Keeps the non-blocking file writer alive; logs are flushed on drop.
    pub struct LoggingGuard {
        _file_guard: tracing_appender::non_blocking::WorkerGuard,
        log_dir: PathBuf,
    }

    impl LoggingGuard {
        /// Get the run folder path
        pub fn log_dir(&self) -> &Path {
            &self.log_dir
        }
    }

    /// Initialize console plus file logging
    ///
    /// Creates a timestamped folder:
    /// ```text
    /// ./logs/
    ///   └── run_20250101_120000/
    ///       └── browscroll.log
    /// ```
    ///
    /// # Arguments
    /// * `debug_flags` - Per-crate debug flags for filtering
    /// * `config` - Level and console format
    /// * `log_dir` - Base directory for logs (default: `./logs`)
    /// * `retention_days` - Keep logs for N days (default: 30)
    /// * `retention_runs` - Keep N most recent runs (default: 10)
    pub fn init_logging(
        debug_flags: &CrateDebugFlags,
        config: &LoggingConfig,
        log_dir: Option<PathBuf>,
        retention_days: Option<u64>,
        retention_runs: Option<usize>,
    ) -> Result<LoggingGuard> {
        let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));

        let timestamp = Local::now().format(RUN_TIMESTAMP_FORMAT);
        let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

        prune_old_runs(&base_log_dir, retention_days, retention_runs, &run_folder)?;

        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(build_filter(debug_flags, config)?)
            .boxed();

        let appender = rolling::never(&run_folder, "browscroll.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(build_filter(debug_flags, config)?)
            .boxed();

        Registry::default()
            .with(vec![console_layer, file_layer])
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(LoggingGuard {
            _file_guard: file_guard,
            log_dir: run_folder,
        })
    }

    /// Remove run folders older than `retention_days`, then all but the newest
    /// `retention_runs`. `keep` is never removed.
    ///
    /// Returns the number of folders removed.
    pub fn prune_old_runs(
        base_log_dir: &Path,
        retention_days: Option<u64>,
        retention_runs: Option<usize>,
        keep: &Path,
    ) -> Result<usize> {
        if !base_log_dir.exists() {
            return Ok(0);
        }

        let retention_days = retention_days.unwrap_or(30);
        let retention_runs = retention_runs.unwrap_or(10);
        let cutoff = Local::now().naive_local() - chrono::Duration::days(retention_days as i64);

        let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            if !path.is_dir() || path == keep {
                continue;
            }
            let stamp = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix(RUN_PREFIX))
                .and_then(|s| NaiveDateTime::parse_from_str(s, RUN_TIMESTAMP_FORMAT).ok());
            if let Some(stamp) = stamp {
                runs.push((path, stamp));
            }
        }

        // Newest first
        runs.sort_by(|a, b| b.1.cmp(&a.1));

        // `keep` occupies one retention slot
        let slots = retention_runs.saturating_sub(1);
        let mut removed = 0;
        for (index, (path, stamp)) in runs.iter().enumerate() {
            if *stamp < cutoff || index >= slots {
                match std::fs::remove_dir_all(path) {
                    Ok(()) => removed += 1,
                    Err(e) => eprintln!(
                        "Warning: Failed to remove old log directory {}: {}",
                        path.display(),
                        e
                    ),
                }
            }
        }

        Ok(removed)
    }

}
