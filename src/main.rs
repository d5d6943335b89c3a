// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use browscroll::config::{load_config_or_default, validate_config};
use browscroll::hal::build_sink;
use browscroll::livelink::LiveLinkReceiver;
use browscroll::observability::{debug_flags_help, CrateDebugFlags};
use browscroll::pacer::{PacerError, PacingEngine};
use browscroll::{
    brow_mixer_from_settings, logging_config_from_settings, pacer_config_from_settings,
    run_tracking,
};

/// browscroll - scroll with your eyebrows (LiveLink Face in, mouse wheel out)
#[derive(Parser, Debug)]
#[command(name = "browscroll", version, author, long_about = None)]
struct Args {
    /// Path to browscroll.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UDP port to listen on for LiveLink Face
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind the UDP socket to
    #[arg(long)]
    bind_host: Option<String>,

    /// X11 display for the xtest sink (defaults to $DISPLAY)
    #[arg(long)]
    display: Option<String>,

    /// Log scroll batches instead of clicking the mouse wheel
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for per-run log folders (needs the file-logging feature)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print the per-crate debug flags and exit
    #[arg(long, default_value_t = false)]
    help_debug: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(port) = self.port {
            overrides.insert("port".to_string(), port.to_string());
        }
        if let Some(host) = &self.bind_host {
            overrides.insert("bind_host".to_string(), host.clone());
        }
        if let Some(display) = &self.display {
            overrides.insert("display".to_string(), display.clone());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        if self.dry_run {
            overrides.insert("sink".to_string(), "log".to_string());
        }
        overrides
    }
}

/// `--debug-*` flags are handled by the observability crate, not clap
fn split_debug_args() -> (Vec<String>, Vec<String>) {
    std::env::args().partition(|arg| arg.starts_with("--debug-"))
}

fn main() -> Result<()> {
    let (debug_args, clap_args) = split_debug_args();
    let args = Args::parse_from(clap_args);

    if args.help_debug {
        print!("{}", debug_flags_help());
        return Ok(());
    }

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(value) = std::env::var("BROWSCROLL_DEBUG") {
        debug_flags.merge_env_value(&value);
    }

    let overrides = args.overrides();
    let config = load_config_or_default(args.config.as_deref(), Some(&overrides))
        .context("Failed to load configuration")?;
    validate_config(&config)?;

    let logging = logging_config_from_settings(&config.logging);
    #[cfg(feature = "file-logging")]
    let _log_guard = browscroll::observability::init_logging(
        &debug_flags,
        &logging,
        args.log_dir.clone(),
        None,
        None,
    )?;
    #[cfg(not(feature = "file-logging"))]
    browscroll::observability::init_console_logging(&debug_flags, &logging)?;
    #[cfg(not(feature = "file-logging"))]
    if let Some(dir) = &args.log_dir {
        warn!("Ignoring --log-dir {}: built without file-logging", dir.display());
    }

    print_banner();

    let pacer_config = pacer_config_from_settings(&config.pacer);
    info!(
        "Pacer: {:.1}-{:.1} ticks/s, ease {:.2}, dead zone {:.3}, {} ticks/flush at {:.0} Hz",
        pacer_config.min_rate,
        pacer_config.max_rate,
        pacer_config.ease_power,
        pacer_config.hysteresis,
        pacer_config.max_ticks_per_flush,
        pacer_config.flush_hz()
    );

    let sink = build_sink(&config.sink);
    let engine = PacingEngine::new(pacer_config, sink).context("Failed to start pacing engine")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Shutdown signal received...");
        r.store(false, Ordering::SeqCst);
    })?;

    let tracking = &config.tracking;
    let mut receiver = LiveLinkReceiver::bind(
        &tracking.bind_host,
        tracking.port,
        Duration::from_millis(tracking.recv_timeout_ms),
    )
    .with_context(|| format!("Failed to bind {}:{}", tracking.bind_host, tracking.port))?;

    let mixer = brow_mixer_from_settings(tracking);
    info!("Tracking running (Press Ctrl+C to stop)...");
    let result = run_tracking(&mut receiver, &mixer, &engine.amount_handle(), &running);

    engine.set_amount(0.0);
    match engine.stop() {
        Ok(()) => {}
        Err(e @ PacerError::ShutdownTimeout { .. }) => warn!("{}", e),
        Err(e) => return Err(e.into()),
    }

    let frames = result.context("Face tracking receiver failed")?;
    info!("Shutdown complete ({} frames processed)", frames);
    Ok(())
}

fn print_banner() {
    info!("browscroll v{}", browscroll::VERSION);
    info!("  pacer v{}", browscroll::pacer::VERSION);
}
