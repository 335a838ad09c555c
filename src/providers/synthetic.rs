//! Deterministic provider driven by a caller-supplied sequence of
//! `(value, valid)` pairs, used by the `simulation` demo binary and by
//! integration tests that need reproducible sequences without depending on
//! host state.

use chrono::Utc;

use crate::scheduler::SignalProvider;
use crate::types::Sample;

pub struct SyntheticProvider {
    id: String,
    sequence: Vec<(f64, bool)>,
    index: usize,
    cycle: bool,
}

impl SyntheticProvider {
    pub fn new(id: impl Into<String>, sequence: Vec<(f64, bool)>, cycle: bool) -> Self {
        Self { id: id.into(), sequence, index: 0, cycle }
    }
}

impl SignalProvider for SyntheticProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn read(&mut self) -> Sample {
        let now = Utc::now();
        if self.sequence.is_empty() {
            return Sample::invalid(&self.id, now);
        }
        if self.index >= self.sequence.len() {
            if self.cycle {
                self.index = 0;
            } else {
                let (value, valid) = *self.sequence.last().unwrap();
                return if valid {
                    Sample::valid(&self.id, value, now)
                } else {
                    Sample::invalid(&self.id, now)
                };
            }
        }
        let (value, valid) = self.sequence[self.index];
        self.index += 1;
        if valid {
            Sample::valid(&self.id, value, now)
        } else {
            Sample::invalid(&self.id, now)
        }
    }
}
