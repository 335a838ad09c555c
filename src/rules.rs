//! Stateless severity rules evaluated against a [`MeasurementWindow`].
//!
//! Rules stay dynamically dispatched (`Box<dyn Rule>`) rather than a closed
//! enum: the spec's Non-goals exclude hot-reconfiguration of rules at
//! runtime, not extensibility of the rule set itself.

use std::collections::HashMap;

use chrono::Utc;

use crate::types::{RuleResult, Severity};
use crate::window::MeasurementWindow;

/// A pure predicate producing a severity verdict for one signal over a
/// window. Rules never mutate state and never consult anything but the
/// window passed to them.
pub trait Rule: Send + Sync {
    fn evaluate(&self, window: &MeasurementWindow, signal_id: &str) -> RuleResult;
    fn name(&self) -> &str;
}

fn ok(rule_name: &str, signal_id: &str) -> RuleResult {
    RuleResult {
        rule_name: rule_name.to_string(),
        signal_id: signal_id.to_string(),
        severity: Severity::Ok,
        message: String::new(),
    }
}

// ============================================================================
// ThresholdRule
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: f64,
    max: f64,
    breach_severity: Severity,
}

enum ThresholdTarget {
    /// Applies to every signal, or only `target_signal` when non-empty.
    Scalar { bounds: Bounds, target_signal: String },
    /// Per-signal bounds; signals absent from the map return OK.
    Map(HashMap<String, Bounds>),
}

pub struct ThresholdRule {
    name: String,
    target: ThresholdTarget,
}

impl ThresholdRule {
    /// Scalar construction: applies to every signal when `target_signal` is
    /// empty, otherwise only to that one signal.
    pub fn scalar(
        min: f64,
        max: f64,
        breach_severity: Severity,
        target_signal: impl Into<String>,
    ) -> Self {
        let target_signal = target_signal.into();
        let name = if target_signal.is_empty() {
            "threshold".to_string()
        } else {
            format!("threshold:{target_signal}")
        };
        Self {
            name,
            target: ThresholdTarget::Scalar {
                bounds: Bounds { min, max, breach_severity },
                target_signal,
            },
        }
    }

    /// Per-signal map construction.
    pub fn per_signal(
        bounds: impl IntoIterator<Item = (String, (f64, f64, Severity))>,
    ) -> Self {
        let map = bounds
            .into_iter()
            .map(|(id, (min, max, breach_severity))| {
                (id, Bounds { min, max, breach_severity })
            })
            .collect();
        Self {
            name: "threshold:map".to_string(),
            target: ThresholdTarget::Map(map),
        }
    }
}

impl Rule for ThresholdRule {
    fn evaluate(&self, window: &MeasurementWindow, signal_id: &str) -> RuleResult {
        let bounds = match &self.target {
            ThresholdTarget::Scalar { bounds, target_signal } => {
                if !target_signal.is_empty() && target_signal != signal_id {
                    return ok(&self.name, signal_id);
                }
                *bounds
            }
            ThresholdTarget::Map(map) => match map.get(signal_id) {
                Some(bounds) => *bounds,
                None => return ok(&self.name, signal_id),
            },
        };

        let latest = window.latest(signal_id);
        if !latest.valid {
            return RuleResult {
                rule_name: self.name.clone(),
                signal_id: signal_id.to_string(),
                severity: Severity::Failed,
                message: "no valid reading".to_string(),
            };
        }

        if latest.value < bounds.min || latest.value > bounds.max {
            return RuleResult {
                rule_name: self.name.clone(),
                signal_id: signal_id.to_string(),
                severity: bounds.breach_severity,
                message: format!(
                    "value {} outside bounds [{}, {}]",
                    latest.value, bounds.min, bounds.max
                ),
            };
        }

        ok(&self.name, signal_id)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// ImplausibleValueRule
// ============================================================================

/// Hard physical bounds independent of per-signal thresholds; delegates
/// missing-data handling to [`MissingDataRule`].
pub struct ImplausibleValueRule {
    absolute_min: f64,
    absolute_max: f64,
}

impl ImplausibleValueRule {
    pub fn new(absolute_min: f64, absolute_max: f64) -> Self {
        Self { absolute_min, absolute_max }
    }
}

impl Rule for ImplausibleValueRule {
    fn evaluate(&self, window: &MeasurementWindow, signal_id: &str) -> RuleResult {
        let latest = window.latest(signal_id);
        if !latest.valid {
            return ok(self.name(), signal_id);
        }
        if latest.value < self.absolute_min || latest.value > self.absolute_max {
            return RuleResult {
                rule_name: self.name().to_string(),
                signal_id: signal_id.to_string(),
                severity: Severity::Failed,
                message: format!(
                    "value {} outside physically plausible range [{}, {}]",
                    latest.value, self.absolute_min, self.absolute_max
                ),
            };
        }
        ok(self.name(), signal_id)
    }

    fn name(&self) -> &str {
        "implausible_value"
    }
}

// ============================================================================
// RateOfChangeRule
// ============================================================================

pub struct RateOfChangeRule {
    max_rate_per_second: f64,
}

impl RateOfChangeRule {
    pub fn new(max_rate_per_second: f64) -> Self {
        Self { max_rate_per_second }
    }
}

impl Rule for RateOfChangeRule {
    fn evaluate(&self, window: &MeasurementWindow, signal_id: &str) -> RuleResult {
        let readings = window.readings_for(signal_id);
        if readings.len() < 2 {
            return ok(self.name(), signal_id);
        }
        let (v0, v1) = (&readings[readings.len() - 2], &readings[readings.len() - 1]);
        if !v0.valid || !v1.valid {
            return ok(self.name(), signal_id);
        }
        let dt = (v1.timestamp - v0.timestamp).num_milliseconds() as f64 / 1000.0;
        if dt <= 0.0 {
            return ok(self.name(), signal_id);
        }
        let rate = (v1.value - v0.value).abs() / dt;
        if rate > self.max_rate_per_second {
            return RuleResult {
                rule_name: self.name().to_string(),
                signal_id: signal_id.to_string(),
                severity: Severity::Degraded,
                message: format!(
                    "rate of change {rate:.4}/s exceeds {}/s",
                    self.max_rate_per_second
                ),
            };
        }
        ok(self.name(), signal_id)
    }

    fn name(&self) -> &str {
        "rate_of_change"
    }
}

// ============================================================================
// MissingDataRule
// ============================================================================

pub struct MissingDataRule {
    max_age: chrono::Duration,
    fail_age: chrono::Duration,
}

impl MissingDataRule {
    /// `max_age` and `fail_age` are in milliseconds; `max_age < fail_age`.
    pub fn new(max_age_ms: i64, fail_age_ms: i64) -> Self {
        Self {
            max_age: chrono::Duration::milliseconds(max_age_ms),
            fail_age: chrono::Duration::milliseconds(fail_age_ms),
        }
    }
}

impl Rule for MissingDataRule {
    fn evaluate(&self, window: &MeasurementWindow, signal_id: &str) -> RuleResult {
        let latest = window.latest(signal_id);
        if !latest.valid {
            return RuleResult {
                rule_name: self.name().to_string(),
                signal_id: signal_id.to_string(),
                severity: Severity::Failed,
                message: "no valid reading".to_string(),
            };
        }
        let age = Utc::now() - latest.timestamp;
        if age > self.fail_age {
            return RuleResult {
                rule_name: self.name().to_string(),
                signal_id: signal_id.to_string(),
                severity: Severity::Failed,
                message: format!("no reading for {}ms (fail threshold)", age.num_milliseconds()),
            };
        }
        if age > self.max_age {
            return RuleResult {
                rule_name: self.name().to_string(),
                signal_id: signal_id.to_string(),
                severity: Severity::Degraded,
                message: format!("no reading for {}ms (stale)", age.num_milliseconds()),
            };
        }
        ok(self.name(), signal_id)
    }

    fn name(&self) -> &str {
        "missing_data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use chrono::Duration;

    fn window_with(id: &str, value: f64, valid: bool) -> MeasurementWindow {
        let mut w = MeasurementWindow::new(8).unwrap();
        let sample = if valid {
            Sample::valid(id, value, Utc::now())
        } else {
            Sample::invalid(id, Utc::now())
        };
        w.push(sample);
        w
    }

    #[test]
    fn threshold_boundary_inclusive_at_max_and_min() {
        let rule = ThresholdRule::scalar(0.0, 1.0, Severity::Degraded, "");
        let w = window_with("x", 1.0, true);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
        let w = window_with("x", 0.0, true);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
    }

    #[test]
    fn threshold_breach_outside_bounds() {
        let rule = ThresholdRule::scalar(0.0, 1.0, Severity::Degraded, "");
        let w = window_with("x", 1.5, true);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Degraded);
    }

    #[test]
    fn threshold_invalid_reading_is_failed_regardless_of_bounds() {
        let rule = ThresholdRule::scalar(0.0, 1.0, Severity::Degraded, "");
        let w = window_with("x", 0.0, false);
        let result = rule.evaluate(&w, "x");
        assert_eq!(result.severity, Severity::Failed);
        assert_eq!(result.message, "no valid reading");
    }

    #[test]
    fn threshold_untargeted_signal_is_ok() {
        let rule = ThresholdRule::scalar(0.05, 1.0, Severity::Degraded, "battery");
        let w = window_with("cpu_load", 50.0, true);
        assert_eq!(rule.evaluate(&w, "cpu_load").severity, Severity::Ok);
    }

    #[test]
    fn threshold_battery_inverted_bounds_boundary_inclusive() {
        let rule = ThresholdRule::scalar(0.05, 1.0, Severity::Degraded, "battery");
        assert_eq!(rule.evaluate(&window_with("battery", 1.0, true), "battery").severity, Severity::Ok);
        assert_eq!(rule.evaluate(&window_with("battery", 0.02, true), "battery").severity, Severity::Degraded);
        assert_eq!(rule.evaluate(&window_with("battery", 0.05, true), "battery").severity, Severity::Ok);
    }

    #[test]
    fn threshold_map_absent_signal_is_ok() {
        let rule = ThresholdRule::per_signal([("cpu_load".to_string(), (0.0, 0.9, Severity::Degraded))]);
        let w = window_with("storage", 5.0, true);
        assert_eq!(rule.evaluate(&w, "storage").severity, Severity::Ok);
    }

    #[test]
    fn implausible_value_rule_fails_outside_absolute_bounds() {
        let rule = ImplausibleValueRule::new(-1.0, 200.0);
        let w = window_with("x", 999.0, true);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Failed);
    }

    #[test]
    fn implausible_value_rule_delegates_invalid_reading_to_missing_data() {
        let rule = ImplausibleValueRule::new(-1.0, 200.0);
        let w = window_with("x", 0.0, false);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
    }

    #[test]
    fn rate_of_change_ok_with_fewer_than_two_samples() {
        let rule = RateOfChangeRule::new(0.5);
        let w = window_with("x", 0.5, true);
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
    }

    #[test]
    fn rate_of_change_ok_with_identical_timestamps() {
        let rule = RateOfChangeRule::new(0.5);
        let mut w = MeasurementWindow::new(8).unwrap();
        let now = Utc::now();
        w.push(Sample::valid("x", 0.0, now));
        w.push(Sample::valid("x", 10.0, now));
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
    }

    #[test]
    fn rate_of_change_degraded_when_rate_exceeds_limit() {
        let rule = RateOfChangeRule::new(0.5);
        let mut w = MeasurementWindow::new(8).unwrap();
        let now = Utc::now();
        w.push(Sample::valid("x", 0.0, now));
        w.push(Sample::valid("x", 1.0, now + Duration::seconds(1)));
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Degraded);
    }

    #[test]
    fn missing_data_ok_comfortably_inside_max_age() {
        let rule = MissingDataRule::new(5_000, 15_000);
        let mut w = MeasurementWindow::new(8).unwrap();
        // Leaves slack for the wall-clock time elapsed between building this
        // timestamp and `evaluate`'s own `Utc::now()` call, so the test
        // doesn't flake on a boundary that a true `age == max_age` would hit.
        w.push(Sample::valid("x", 0.5, Utc::now() - Duration::milliseconds(4_950)));
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Ok);
    }

    #[test]
    fn missing_data_degraded_strictly_past_max_age() {
        let rule = MissingDataRule::new(5_000, 15_000);
        let mut w = MeasurementWindow::new(8).unwrap();
        w.push(Sample::valid("x", 0.5, Utc::now() - Duration::milliseconds(5_001)));
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Degraded);
    }

    #[test]
    fn missing_data_failed_past_fail_age() {
        let rule = MissingDataRule::new(5_000, 15_000);
        let mut w = MeasurementWindow::new(8).unwrap();
        w.push(Sample::valid("x", 0.5, Utc::now() - Duration::milliseconds(15_001)));
        assert_eq!(rule.evaluate(&w, "x").severity, Severity::Failed);
    }
}
