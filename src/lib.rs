//! Kestrel: a deterministic host-health monitoring core.
//!
//! Periodically samples a fixed set of numeric signals derived from
//! operating-system facilities, classifies each signal and the aggregate
//! system against a composable rule pipeline, and emits a line-oriented
//! structured event stream.
//!
//! ## Architecture
//!
//! - [`window`] — bounded per-signal retention of recent samples
//! - [`rules`] — stateless severity predicates over a window
//! - [`fault`] — in-line fault-injection seam used for lifecycle verification
//! - [`scheduler`] — cadence-aware polling coordinator
//! - [`providers`] — concrete `SignalProvider` implementations
//! - [`engine`] — per-signal and aggregate state machine
//! - [`sink`] — line-oriented JSON event stream
//! - [`config`] — resolved CLI configuration and the standard rule set
//! - [`supervisor`] — the tick loop that wires all of the above together

pub mod config;
pub mod engine;
pub mod fault;
pub mod providers;
pub mod rules;
pub mod scheduler;
pub mod sink;
pub mod supervisor;
pub mod types;
pub mod window;

pub use engine::Engine;
pub use fault::FaultStage;
pub use scheduler::{Scheduler, SignalProvider};
pub use sink::EventSink;
pub use supervisor::Supervisor;
pub use types::{
    ActiveFault, FaultConfig, FaultKind, FaultParameters, RuleResult, Sample, Severity,
    StateTransition, SystemState,
};
pub use window::MeasurementWindow;
