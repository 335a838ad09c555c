//! Core data model: Sample, Severity, SystemState, and the records that
//! flow between the scheduler, fault stage, and engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Sample
// ============================================================================

/// One observation of a signal at one instant.
///
/// Immutable once produced. When `valid` is `false`, `value` carries no
/// meaning and consumers must not interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub signal_id: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
}

impl Sample {
    pub fn valid(signal_id: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            signal_id: signal_id.into(),
            value,
            timestamp,
            valid: true,
        }
    }

    pub fn invalid(signal_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            signal_id: signal_id.into(),
            value: 0.0,
            timestamp,
            valid: false,
        }
    }
}

// ============================================================================
// Severity / SystemState
// ============================================================================

/// Totally ordered rule-evaluation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Ok,
    Degraded,
    Failed,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Degraded => write!(f, "DEGRADED"),
            Severity::Failed => write!(f, "FAILED"),
        }
    }
}

/// The externally reported health classification of a signal or the
/// aggregate system. `Unknown` is only ever the pre-first-observation
/// state: once a signal has produced a Sample it never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    Ok,
    Degraded,
    Failed,
    Unknown,
}

impl SystemState {
    /// Worst-wins ranking used by aggregation: FAILED > UNKNOWN > DEGRADED > OK.
    fn rank(self) -> u8 {
        match self {
            SystemState::Failed => 3,
            SystemState::Unknown => 2,
            SystemState::Degraded => 1,
            SystemState::Ok => 0,
        }
    }

    /// Reduce two states to the worse of the two, per the aggregate ranking.
    pub fn worse(self, other: SystemState) -> SystemState {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }
}

impl From<Severity> for SystemState {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Ok => SystemState::Ok,
            Severity::Degraded => SystemState::Degraded,
            Severity::Failed => SystemState::Failed,
        }
    }
}

impl std::fmt::Display for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemState::Ok => write!(f, "OK"),
            SystemState::Degraded => write!(f, "DEGRADED"),
            SystemState::Failed => write!(f, "FAILED"),
            SystemState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ============================================================================
// RuleResult / StateTransition
// ============================================================================

/// The verdict a single rule reached for a single signal.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub rule_name: String,
    pub signal_id: String,
    pub severity: Severity,
    pub message: String,
}

/// An append-only record of a SystemState change for one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub signal_id: String,
    pub from: SystemState,
    pub to: SystemState,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub const REASON_RULE_EVALUATION: &'static str = "rule_evaluation";
}

// ============================================================================
// Fault kinds / parameters
// ============================================================================

/// The five fault kinds a [`FaultStage`](crate::fault::FaultStage) can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    Spike,
    InvalidValue,
    MissingUpdate,
    DelayedReading,
    InterfaceFailure,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::Spike => "Spike",
            FaultKind::InvalidValue => "InvalidValue",
            FaultKind::MissingUpdate => "MissingUpdate",
            FaultKind::DelayedReading => "DelayedReading",
            FaultKind::InterfaceFailure => "InterfaceFailure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Spike" => Some(FaultKind::Spike),
            "InvalidValue" => Some(FaultKind::InvalidValue),
            "MissingUpdate" => Some(FaultKind::MissingUpdate),
            "DelayedReading" => Some(FaultKind::DelayedReading),
            "InterfaceFailure" => Some(FaultKind::InterfaceFailure),
            _ => None,
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters shared by all fault kinds; only the fields relevant to a
/// given [`FaultKind`] are consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultParameters {
    pub injected_value: f64,
    pub suppress_cycles: u32,
    pub delay_ms: u64,
}

/// A fault currently installed on one signal inside the [`FaultStage`](crate::fault::FaultStage).
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFault {
    pub kind: FaultKind,
    pub parameters: FaultParameters,
    pub remaining_cycles: u32,
}

// ============================================================================
// FaultConfig (declarative, loaded from a fault profile)
// ============================================================================

/// One scheduled fault occurrence, as declared in a fault profile JSON
/// document (see [`crate::fault::profile`]) and driven by the supervisor loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultConfig {
    pub signal_id: String,
    pub fault_kind: FaultKind,
    pub parameters: FaultParameters,
    pub trigger_after_seconds: f64,
    pub duration_seconds: f64,
    pub triggered: bool,
    pub cleared: bool,
    pub injected_at: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_state_worst_wins_ranking() {
        assert_eq!(SystemState::Ok.worse(SystemState::Degraded), SystemState::Degraded);
        assert_eq!(SystemState::Degraded.worse(SystemState::Unknown), SystemState::Unknown);
        assert_eq!(SystemState::Unknown.worse(SystemState::Failed), SystemState::Failed);
        assert_eq!(SystemState::Failed.worse(SystemState::Ok), SystemState::Failed);
    }

    #[test]
    fn severity_orders_ok_degraded_failed() {
        assert!(Severity::Ok < Severity::Degraded);
        assert!(Severity::Degraded < Severity::Failed);
    }

    #[test]
    fn fault_kind_round_trips_through_display_name() {
        for kind in [
            FaultKind::Spike,
            FaultKind::InvalidValue,
            FaultKind::MissingUpdate,
            FaultKind::DelayedReading,
            FaultKind::InterfaceFailure,
        ] {
            assert_eq!(FaultKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FaultKind::parse("NotAKind"), None);
    }
}
