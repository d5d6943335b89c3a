// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loader with environment and CLI overrides
//!
//! Precedence, lowest to highest: TOML file, `BROWSCROLL_*` environment
//! variables, CLI arguments.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{BrowscrollConfig, ConfigError, ConfigResult};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "browscroll.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `BROWSCROLL_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("BROWSCROLL_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by BROWSCROLL_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet BROWSCROLL_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns an error if the file is not found, cannot be read, or is invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrowscrollConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: BrowscrollConfig = toml::from_str(&content)?;

    Ok(with_overrides(config, cli_args))
}

/// Like [`load_config`], but falls back to built-in defaults when no file is found.
///
/// An explicit `config_path` that does not exist is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrowscrollConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var("BROWSCROLL_CONFIG_PATH").is_err() => {
            Ok(with_overrides(BrowscrollConfig::default(), cli_args))
        }
        Err(e) => Err(e),
    }
}

fn with_overrides(
    mut config: BrowscrollConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> BrowscrollConfig {
    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }
    config
}

fn set_parsed<T: std::str::FromStr>(target: &mut T, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BROWSCROLL_PORT` -> `tracking.port`
/// - `BROWSCROLL_BIND_HOST` -> `tracking.bind_host`
/// - `BROWSCROLL_MIN_RATE` -> `pacer.min_rate`
/// - `BROWSCROLL_MAX_RATE` -> `pacer.max_rate`
/// - `BROWSCROLL_EASE_POWER` -> `pacer.ease_power`
/// - `BROWSCROLL_HYSTERESIS` -> `pacer.hysteresis`
/// - `BROWSCROLL_MAX_TICKS_PER_FLUSH` -> `pacer.max_ticks_per_flush`
/// - `BROWSCROLL_FLUSH_HZ` -> `pacer.flush_hz`
/// - `BROWSCROLL_SINK` -> `sink.kind`
/// - `BROWSCROLL_LOG_LEVEL` -> `logging.level`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut BrowscrollConfig) {
    if let Ok(value) = env::var("BROWSCROLL_PORT") {
        set_parsed(&mut config.tracking.port, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_BIND_HOST") {
        config.tracking.bind_host = value;
    }

    if let Ok(value) = env::var("BROWSCROLL_MIN_RATE") {
        set_parsed(&mut config.pacer.min_rate, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_MAX_RATE") {
        set_parsed(&mut config.pacer.max_rate, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_EASE_POWER") {
        set_parsed(&mut config.pacer.ease_power, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_HYSTERESIS") {
        set_parsed(&mut config.pacer.hysteresis, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_MAX_TICKS_PER_FLUSH") {
        set_parsed(&mut config.pacer.max_ticks_per_flush, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_FLUSH_HZ") {
        set_parsed(&mut config.pacer.flush_hz, &value);
    }

    if let Ok(value) = env::var("BROWSCROLL_SINK") {
        set_parsed(&mut config.sink.kind, &value);
    }
    if let Ok(value) = env::var("BROWSCROLL_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognised keys: `port`, `bind_host`, `sink`, `display`, `invert`,
/// `log_level`, `flush_hz`, `max_rate`, `min_rate`.
pub fn apply_cli_overrides(config: &mut BrowscrollConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("port") {
        set_parsed(&mut config.tracking.port, value);
    }
    if let Some(value) = cli_args.get("bind_host") {
        config.tracking.bind_host = value.clone();
    }
    if let Some(value) = cli_args.get("sink") {
        set_parsed(&mut config.sink.kind, value);
    }
    if let Some(value) = cli_args.get("display") {
        config.sink.display = Some(value.clone());
    }
    if let Some(value) = cli_args.get("invert") {
        config.sink.invert = value.to_lowercase() == "true" || value == "1";
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("flush_hz") {
        set_parsed(&mut config.pacer.flush_hz, value);
    }
    if let Some(value) = cli_args.get("max_rate") {
        set_parsed(&mut config.pacer.max_rate, value);
    }
    if let Some(value) = cli_args.get("min_rate") {
        set_parsed(&mut config.pacer.min_rate, value);
    }
}
