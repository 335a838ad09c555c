//! Reads the aggregate `cpu` line of `/proc/stat` across two successive
//! calls to derive a load fraction.

use std::path::PathBuf;

use chrono::Utc;

use crate::scheduler::SignalProvider;
use crate::types::Sample;

const SIGNAL_ID: &str = "cpu_load";

struct Ticks {
    idle: u64,
    total: u64,
}

fn read_ticks(path: &std::path::Path) -> Option<Ticks> {
    let contents = std::fs::read_to_string(path).ok()?;
    let line = contents.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|f| f.parse().ok())
        .collect();
    // user nice system idle iowait irq softirq steal guest guest_nice
    if fields.len() < 4 {
        return None;
    }
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    let total: u64 = fields.iter().sum();
    Some(Ticks { idle, total })
}

pub struct CpuLoadProvider {
    stat_path: PathBuf,
    previous: Option<Ticks>,
}

impl CpuLoadProvider {
    pub fn new() -> Self {
        Self { stat_path: PathBuf::from("/proc/stat"), previous: None }
    }

    /// Used by tests to point at a fixture file instead of `/proc/stat`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { stat_path: path.into(), previous: None }
    }
}

impl Default for CpuLoadProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalProvider for CpuLoadProvider {
    fn id(&self) -> &str {
        SIGNAL_ID
    }

    fn read(&mut self) -> Sample {
        let now = Utc::now();
        let Some(current) = read_ticks(&self.stat_path) else {
            return Sample::invalid(SIGNAL_ID, now);
        };

        let sample = match &self.previous {
            None => Sample::invalid(SIGNAL_ID, now),
            Some(prev) => {
                let total_delta = current.total.saturating_sub(prev.total);
                let idle_delta = current.idle.saturating_sub(prev.idle);
                if total_delta == 0 {
                    Sample::invalid(SIGNAL_ID, now)
                } else {
                    let load = 1.0 - (idle_delta as f64 / total_delta as f64);
                    Sample::valid(SIGNAL_ID, load.clamp(0.0, 1.0), now)
                }
            }
        };

        self.previous = Some(current);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    fn fixture(cpu_line: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{cpu_line}").unwrap();
        file
    }

    #[test]
    fn first_read_has_no_prior_sample_and_is_invalid() {
        let fixture = fixture("cpu  100 0 100 800 0 0 0 0 0 0");
        let mut provider = CpuLoadProvider::with_path(fixture.path());
        assert!(!provider.read().valid);
    }

    #[test]
    fn second_read_computes_load_fraction() {
        let mut fixture = fixture("cpu  100 0 100 800 0 0 0 0 0 0");
        let mut provider = CpuLoadProvider::with_path(fixture.path());
        provider.read();

        // idle unchanged, total up by 100 -> full load this interval.
        fixture.as_file_mut().set_len(0).unwrap();
        fixture.as_file_mut().seek(SeekFrom::Start(0)).unwrap();
        writeln!(fixture, "cpu  200 0 100 800 0 0 0 0 0 0").unwrap();
        let sample = provider.read();
        assert!(sample.valid);
        assert_eq!(sample.value, 1.0);
    }

    #[test]
    fn missing_file_reports_invalid_not_panic() {
        let mut provider = CpuLoadProvider::with_path("/nonexistent/proc/stat");
        let sample = provider.read();
        assert!(!sample.valid);
    }
}
