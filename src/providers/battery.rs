//! Reads the first matching `/sys/class/power_supply/*/capacity` node.
//! Reports `valid=false` on desktops/servers with no battery — an
//! expected, not exceptional, outcome.

use std::path::PathBuf;

use chrono::Utc;

use crate::scheduler::SignalProvider;
use crate::types::Sample;

const SIGNAL_ID: &str = "battery";
const DEFAULT_GLOB_ROOT: &str = "/sys/class/power_supply";

pub struct BatteryProvider {
    power_supply_root: PathBuf,
}

impl BatteryProvider {
    pub fn new() -> Self {
        Self { power_supply_root: PathBuf::from(DEFAULT_GLOB_ROOT) }
    }

    pub fn with_root(path: impl Into<PathBuf>) -> Self {
        Self { power_supply_root: path.into() }
    }

    fn find_capacity(&self) -> Option<u8> {
        let entries = std::fs::read_dir(&self.power_supply_root).ok()?;
        for entry in entries.flatten() {
            let capacity_path = entry.path().join("capacity");
            if let Ok(raw) = std::fs::read_to_string(&capacity_path) {
                if let Ok(value) = raw.trim().parse::<u8>() {
                    return Some(value);
                }
            }
        }
        None
    }
}

impl Default for BatteryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalProvider for BatteryProvider {
    fn id(&self) -> &str {
        SIGNAL_ID
    }

    fn read(&mut self) -> Sample {
        let now = Utc::now();
        match self.find_capacity() {
            Some(capacity) => Sample::valid(SIGNAL_ID, f64::from(capacity) / 100.0, now),
            None => Sample::invalid(SIGNAL_ID, now),
        }
    }
}
