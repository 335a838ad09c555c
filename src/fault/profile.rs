//! Loads a fault profile JSON document into a list of [`FaultConfig`]s.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FaultConfig, FaultKind, FaultParameters};

#[derive(Debug, Error)]
pub enum FaultProfileError {
    #[error("failed to read fault profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse fault profile: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown fault kind: {0}")]
    UnknownFaultKind(String),
}

#[derive(Debug, Deserialize, Serialize)]
struct ProfileDocument {
    faults: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ProfileEntry {
    sensor_id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    suppress_cycles: u32,
    #[serde(default)]
    delay_ms: u64,
    #[serde(default)]
    trigger_after_s: f64,
    #[serde(default)]
    duration_s: f64,
}

/// Parses `{"faults": [ ... ]}` into a list of [`FaultConfig`]s with runtime
/// flags zeroed.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<FaultConfig>, FaultProfileError> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

pub fn parse(raw: &str) -> Result<Vec<FaultConfig>, FaultProfileError> {
    let doc: ProfileDocument = serde_json::from_str(raw)?;
    doc.faults
        .into_iter()
        .map(|entry| {
            let fault_kind = FaultKind::parse(&entry.kind)
                .ok_or_else(|| FaultProfileError::UnknownFaultKind(entry.kind.clone()))?;
            Ok(FaultConfig {
                signal_id: entry.sensor_id,
                fault_kind,
                parameters: FaultParameters {
                    injected_value: entry.value,
                    suppress_cycles: entry.suppress_cycles,
                    delay_ms: entry.delay_ms,
                },
                trigger_after_seconds: entry.trigger_after_s,
                duration_seconds: entry.duration_s,
                triggered: false,
                cleared: false,
                injected_at: None,
            })
        })
        .collect()
}

/// Serializes a list of [`FaultConfig`]s back to the profile document shape,
/// for round-trip tests. Runtime flags are not carried — reloading the
/// output always yields fresh (untriggered, uncleared) configs.
pub fn write(configs: &[FaultConfig]) -> String {
    let doc = ProfileDocument {
        faults: configs
            .iter()
            .map(|c| ProfileEntry {
                sensor_id: c.signal_id.clone(),
                kind: c.fault_kind.as_str().to_string(),
                value: c.parameters.injected_value,
                suppress_cycles: c.parameters.suppress_cycles,
                delay_ms: c.parameters.delay_ms,
                trigger_after_s: c.trigger_after_seconds,
                duration_s: c.duration_seconds,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc).expect("fault profile document is always serializable")
}
