//! System-wide default constants. Centralises magic numbers scattered
//! across the spec's §6 CLI contract and §4 rule parameters.

// ============================================================================
// Window / scheduling
// ============================================================================

/// Default [`MeasurementWindow`](crate::window::MeasurementWindow) capacity.
pub const WINDOW_CAPACITY_DEFAULT: usize = 64;

pub const CPU_CADENCE_MS: u64 = 1_000;
pub const MEMORY_CADENCE_MS: u64 = 2_000;
pub const BATTERY_CADENCE_MS: u64 = 5_000;
pub const STORAGE_CADENCE_MS: u64 = 10_000;

/// Supervisor loop tick interval between ticks.
pub const SUPERVISOR_TICK_MS: u64 = 500;

// ============================================================================
// Standard rule set (`--threshold` contract)
// ============================================================================

pub const DEFAULT_THRESHOLD: f64 = 0.95;

pub const MISSING_DATA_MAX_AGE_MS: i64 = 5_000;
pub const MISSING_DATA_FAIL_AGE_MS: i64 = 15_000;
pub const RATE_OF_CHANGE_MAX_PER_SEC: f64 = 0.5;
pub const IMPLAUSIBLE_MIN: f64 = -1.0;
pub const IMPLAUSIBLE_MAX: f64 = 200.0;

pub const DEFAULT_LOG_PATH: &str = "kestrel.jsonl";
pub const DEFAULT_MOUNT_POINT: &str = "/";

pub const CPU_SIGNAL_ID: &str = "cpu_load";
pub const MEMORY_SIGNAL_ID: &str = "memory";
pub const BATTERY_SIGNAL_ID: &str = "battery";
pub const STORAGE_SIGNAL_ID: &str = "storage";
