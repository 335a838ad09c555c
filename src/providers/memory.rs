//! Reads `/proc/meminfo` and computes the fraction of memory in use.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;

use crate::scheduler::SignalProvider;
use crate::types::Sample;

const SIGNAL_ID: &str = "memory";

fn parse_meminfo(contents: &str) -> HashMap<&str, u64> {
    contents
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let value: u64 = rest.split_whitespace().next()?.parse().ok()?;
            Some((key, value))
        })
        .collect()
}

pub struct MemoryProvider {
    meminfo_path: PathBuf,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self { meminfo_path: PathBuf::from("/proc/meminfo") }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { meminfo_path: path.into() }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalProvider for MemoryProvider {
    fn id(&self) -> &str {
        SIGNAL_ID
    }

    fn read(&mut self) -> Sample {
        let now = Utc::now();
        let Ok(contents) = std::fs::read_to_string(&self.meminfo_path) else {
            return Sample::invalid(SIGNAL_ID, now);
        };
        let fields = parse_meminfo(&contents);
        let Some(&total) = fields.get("MemTotal") else {
            return Sample::invalid(SIGNAL_ID, now);
        };
        if total == 0 {
            return Sample::invalid(SIGNAL_ID, now);
        }

        let used_fraction = if let Some(&available) = fields.get("MemAvailable") {
            (total.saturating_sub(available)) as f64 / total as f64
        } else {
            let free = fields.get("MemFree").copied().unwrap_or(0);
            let buffers = fields.get("Buffers").copied().unwrap_or(0);
            let cached = fields.get("Cached").copied().unwrap_or(0);
            let used = total.saturating_sub(free + buffers + cached);
            used as f64 / total as f64
        };

        Sample::valid(SIGNAL_ID, used_fraction.clamp(0.0, 1.0), now)
    }
}
