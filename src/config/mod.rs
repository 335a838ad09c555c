//! Resolved application configuration and the standard rule set builder.
//!
//! Grounded in the teacher's `config::init`/`config::get` global-config
//! pattern, scaled down: this crate's config is small enough to pass by
//! value through `main` rather than stash in a `OnceLock`.

pub mod defaults;

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::{ImplausibleValueRule, MissingDataRule, RateOfChangeRule, Rule, ThresholdRule};
use crate::types::Severity;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold {0} out of range [0.0, 1.0]")]
    ThresholdOutOfRange(f64),
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fault_profile: Option<PathBuf>,
    pub log_path: PathBuf,
    pub threshold: f64,
    pub mount_point: PathBuf,
    pub window_capacity: usize,
}

impl AppConfig {
    pub fn new(
        fault_profile: Option<PathBuf>,
        log_path: PathBuf,
        threshold: f64,
        mount_point: PathBuf,
        window_capacity: usize,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        Ok(Self { fault_profile, log_path, threshold, mount_point, window_capacity })
    }
}

/// Builds the standard rule set described in §6's `--threshold` contract:
/// `ThresholdRule [0.0, T]` for cpu_load/memory/storage, `ThresholdRule
/// [1-T, 1.0]` for battery (inverted-threshold idiom), plus the three
/// signal-agnostic rules.
pub fn standard_rule_set(threshold: f64) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ThresholdRule::per_signal([
            (defaults::CPU_SIGNAL_ID.to_string(), (0.0, threshold, Severity::Degraded)),
            (defaults::MEMORY_SIGNAL_ID.to_string(), (0.0, threshold, Severity::Degraded)),
            (defaults::STORAGE_SIGNAL_ID.to_string(), (0.0, threshold, Severity::Degraded)),
            (defaults::BATTERY_SIGNAL_ID.to_string(), (1.0 - threshold, 1.0, Severity::Degraded)),
        ])),
        Box::new(ImplausibleValueRule::new(defaults::IMPLAUSIBLE_MIN, defaults::IMPLAUSIBLE_MAX)),
        Box::new(RateOfChangeRule::new(defaults::RATE_OF_CHANGE_MAX_PER_SEC)),
        Box::new(MissingDataRule::new(defaults::MISSING_DATA_MAX_AGE_MS, defaults::MISSING_DATA_FAIL_AGE_MS)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let err = AppConfig::new(None, "x.jsonl".into(), 1.5, "/".into(), 64).unwrap_err();
        assert_eq!(err, ConfigError::ThresholdOutOfRange(1.5));
    }

    #[test]
    fn threshold_in_range_is_accepted() {
        assert!(AppConfig::new(None, "x.jsonl".into(), 0.95, "/".into(), 64).is_ok());
    }

    #[test]
    fn standard_rule_set_has_four_rules() {
        assert_eq!(standard_rule_set(0.95).len(), 4);
    }
}
