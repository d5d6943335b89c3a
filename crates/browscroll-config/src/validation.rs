// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem before failing so a broken `browscroll.toml` can be
//! fixed in one pass.

use crate::{BrowscrollConfig, ConfigError, ConfigResult};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    InvalidPort { field: String, port: u16 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort { field, port } => {
                write!(f, "Port {} = {} is not a usable UDP port", field, port)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: impl Into<String>) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    });
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &BrowscrollConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// Every violation in `config`, in section order
pub fn collect_errors(config: &BrowscrollConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_pacer(config, &mut errors);
    validate_tracking(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_pacer(config: &BrowscrollConfig, errors: &mut Vec<ConfigValidationError>) {
    let pacer = &config.pacer;

    if !(pacer.min_rate.is_finite() && pacer.min_rate >= 0.0) {
        invalid(errors, "pacer.min_rate", "must be a non-negative number");
    }
    if !(pacer.max_rate.is_finite() && pacer.max_rate >= pacer.min_rate) {
        invalid(errors, "pacer.max_rate", "must be at least pacer.min_rate");
    }
    if !(pacer.ease_power.is_finite() && pacer.ease_power > 0.0) {
        invalid(errors, "pacer.ease_power", "must be positive");
    }
    if !(pacer.hysteresis.is_finite() && pacer.hysteresis >= 0.0) {
        invalid(errors, "pacer.hysteresis", "must be non-negative");
    }
    if !(pacer.max_input.is_finite() && pacer.max_input > 0.0) {
        invalid(errors, "pacer.max_input", "must be positive");
    }
    if pacer.max_ticks_per_flush == 0 {
        invalid(errors, "pacer.max_ticks_per_flush", "must be at least 1");
    }
    if !(pacer.flush_hz.is_finite() && pacer.flush_hz > 0.0) {
        invalid(errors, "pacer.flush_hz", "must be positive");
    }
    if let Some(limit) = pacer.max_backlog_ticks {
        if !(limit.is_finite() && limit >= f64::from(pacer.max_ticks_per_flush)) {
            invalid(
                errors,
                "pacer.max_backlog_ticks",
                "must be at least pacer.max_ticks_per_flush",
            );
        }
    }
    if pacer.stop_timeout_ms == 0 {
        invalid(errors, "pacer.stop_timeout_ms", "must be at least 1");
    }
}

fn validate_tracking(config: &BrowscrollConfig, errors: &mut Vec<ConfigValidationError>) {
    let tracking = &config.tracking;

    if tracking.port == 0 {
        errors.push(ConfigValidationError::InvalidPort {
            field: "tracking.port".to_string(),
            port: tracking.port,
        });
    }
    if tracking.bind_host.trim().is_empty() {
        invalid(errors, "tracking.bind_host", "must not be empty");
    }
    if !(tracking.scroll_threshold.is_finite() && tracking.scroll_threshold >= 0.0) {
        invalid(errors, "tracking.scroll_threshold", "must be non-negative");
    }
    if !(tracking.scroll_speed.is_finite() && tracking.scroll_speed > 0.0) {
        invalid(errors, "tracking.scroll_speed", "must be positive");
    }
    if !(tracking.max_scroll.is_finite() && tracking.max_scroll > 0.0) {
        invalid(errors, "tracking.max_scroll", "must be positive");
    }
    if tracking.recv_timeout_ms == 0 {
        invalid(errors, "tracking.recv_timeout_ms", "must be at least 1");
    }
}

fn validate_logging(config: &BrowscrollConfig, errors: &mut Vec<ConfigValidationError>) {
    const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
    if !LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        invalid(
            errors,
            "logging.level",
            format!("'{}' is not one of {}", config.logging.level, LEVELS.join(", ")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BrowscrollConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let mut config = BrowscrollConfig::default();
        config.pacer.max_rate = 1.0;
        config.pacer.max_ticks_per_flush = 0;
        config.tracking.port = 0;
        config.logging.level = "chatty".to_string();

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigValidationError::InvalidPort {
            field: "tracking.port".to_string(),
            port: 0,
        }));

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("pacer.max_rate"));
        assert!(message.contains("pacer.max_ticks_per_flush"));
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn test_backlog_below_cap_is_rejected() {
        let mut config = BrowscrollConfig::default();
        config.pacer.max_backlog_ticks = Some(2.0);
        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("pacer.max_backlog_ticks"));

        config.pacer.max_backlog_ticks = Some(12.0);
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_nan_rates_are_rejected() {
        let mut config = BrowscrollConfig::default();
        config.pacer.min_rate = f64::NAN;
        config.pacer.flush_hz = f64::INFINITY;
        let errors = collect_errors(&config);
        assert!(errors.iter().any(|e| e.to_string().contains("pacer.min_rate")));
        assert!(errors.iter().any(|e| e.to_string().contains("pacer.flush_hz")));
    }
}
