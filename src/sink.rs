//! Serializes readings, transitions, fault events, and rule violations as
//! one JSON object per line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::types::{FaultKind, SystemState};

/// Writes to an optional append-only file and to standard output. Guarded
/// by an internal mutex so concurrent callers never interleave a line.
pub struct EventSink {
    file: Mutex<Option<File>>,
}

impl EventSink {
    /// `path` of `None` or `/dev/null` suppresses file output.
    pub fn new(path: Option<&Path>) -> std::io::Result<Self> {
        let file = match path {
            None => None,
            Some(p) if p == Path::new("/dev/null") => None,
            Some(p) => Some(OpenOptions::new().create(true).append(true).open(p)?),
        };
        Ok(Self { file: Mutex::new(file) })
    }

    fn write_line(&self, value: &impl Serialize) {
        let line = match serde_json::to_string(value) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize event, dropping");
                return;
            }
        };

        println!("{line}");

        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            if let Err(err) = writeln!(file, "{line}").and_then(|()| file.flush()) {
                tracing::warn!(error = %err, "failed to write event to log file");
            }
        }
    }

    pub fn reading(&self, sensor: &str, value: f64, valid: bool) {
        self.write_line(&json!({
            "ts": fmt_ts(Utc::now()),
            "type": "reading",
            "sensor": sensor,
            "value": value,
            "valid": valid,
        }));
    }

    pub fn transition(&self, sensor: &str, from: SystemState, to: SystemState, reason: &str) {
        self.write_line(&json!({
            "ts": fmt_ts(Utc::now()),
            "type": "transition",
            "sensor": sensor,
            "from": from.to_string(),
            "to": to.to_string(),
            "reason": reason,
        }));
    }

    pub fn fault(&self, sensor: &str, fault_type: FaultKind, injected_value: f64) {
        self.write_line(&json!({
            "ts": fmt_ts(Utc::now()),
            "type": "fault",
            "sensor": sensor,
            "fault_type": fault_type.as_str(),
            "injected_value": injected_value,
        }));
    }

    pub fn rule_violation(&self, rule: &str, sensor: &str, message: &str) {
        self.write_line(&json!({
            "ts": fmt_ts(Utc::now()),
            "type": "rule_violation",
            "rule": rule,
            "sensor": sensor,
            "message": message,
        }));
    }
}

/// Fixed 20-character `YYYY-MM-DDTHH:MM:SSZ` form, second precision.
fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
