//! In-line fault injection seam sitting between raw samples and the engine.
//!
//! The active-fault table is exclusively owned here; the engine and
//! scheduler never see it.

pub mod profile;

use std::collections::HashMap;
use std::time::Duration;

use crate::types::{ActiveFault, FaultKind, FaultParameters, Sample};

/// Per-signal fault transform. At most one [`ActiveFault`] per signal.
#[derive(Debug, Default)]
pub struct FaultStage {
    active: HashMap<String, ActiveFault>,
}

impl FaultStage {
    pub fn new() -> Self {
        Self { active: HashMap::new() }
    }

    /// Installs a fault, replacing any existing fault for that signal.
    pub fn inject(&mut self, signal_id: impl Into<String>, kind: FaultKind, parameters: FaultParameters) {
        let remaining_cycles = match kind {
            FaultKind::MissingUpdate => parameters.suppress_cycles,
            _ => 0,
        };
        self.active.insert(
            signal_id.into(),
            ActiveFault { kind, parameters, remaining_cycles },
        );
    }

    pub fn clear(&mut self, signal_id: &str) {
        self.active.remove(signal_id);
    }

    pub fn clear_all(&mut self) {
        self.active.clear();
    }

    pub fn has_fault(&self, signal_id: &str) -> bool {
        self.active.contains_key(signal_id)
    }

    /// Applies the fault (if any) registered for `sample.signal_id`.
    /// Self-clearing faults (Spike, exhausted MissingUpdate) are removed
    /// from the table inside this call, not on a timer.
    pub fn apply(&mut self, sample: Sample) -> Sample {
        let Some(fault) = self.active.get_mut(&sample.signal_id) else {
            return sample;
        };

        match fault.kind {
            FaultKind::Spike => {
                let out = Sample {
                    value: fault.parameters.injected_value,
                    ..sample
                };
                self.active.remove(&out.signal_id);
                out
            }
            FaultKind::InvalidValue => Sample {
                value: fault.parameters.injected_value,
                ..sample
            },
            FaultKind::MissingUpdate => {
                if fault.remaining_cycles == 0 {
                    self.active.remove(&sample.signal_id);
                    return sample;
                }
                fault.remaining_cycles -= 1;
                let exhausted = fault.remaining_cycles == 0;
                let out = Sample { valid: false, ..sample };
                if exhausted {
                    self.active.remove(&out.signal_id);
                }
                out
            }
            FaultKind::DelayedReading => {
                std::thread::sleep(Duration::from_millis(fault.parameters.delay_ms));
                sample
            }
            FaultKind::InterfaceFailure => Sample { valid: false, ..sample },
        }
    }
}
