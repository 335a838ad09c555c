//! Bounded per-signal retention of recent [`Sample`]s.
//!
//! A mapping from signal id to a fixed-size ring is simpler than one global
//! ring that must be scanned per signal, and keeps `latest`/`readings_for`
//! O(1) / O(capacity).

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use thiserror::Error;

use crate::types::Sample;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("measurement window capacity must be positive")]
    ZeroCapacity,
}

/// Oldest-evicting ring buffer of [`Sample`]s, keyed by signal id.
#[derive(Debug, Clone)]
pub struct MeasurementWindow {
    capacity: usize,
    rings: HashMap<String, VecDeque<Sample>>,
}

impl MeasurementWindow {
    /// Default capacity per §3: 64 samples per signal.
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            rings: HashMap::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `sample` to the ring for its signal, evicting the oldest
    /// entry once the ring is at capacity. Allocates a fresh ring on first
    /// sight of a signal id.
    pub fn push(&mut self, sample: Sample) {
        let ring = self
            .rings
            .entry(sample.signal_id.clone())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(sample);
    }

    /// Most recently pushed sample for `id`, or an invalid sentinel if the
    /// signal has never been observed.
    pub fn latest(&self, id: &str) -> Sample {
        self.rings
            .get(id)
            .and_then(|ring| ring.back())
            .cloned()
            .unwrap_or_else(|| Sample::invalid(id, Utc::now()))
    }

    /// Retained samples for `id`, oldest-first. Empty for unknown signals.
    pub fn readings_for(&self, id: &str) -> Vec<Sample> {
        self.rings
            .get(id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// True once at least one sample has been pushed for `id`.
    pub fn has_seen(&self, id: &str) -> bool {
        self.rings.contains_key(id)
    }

    /// All signal ids that have ever received a push, in first-seen order
    /// is not guaranteed (backed by a hash map); callers that need a
    /// deterministic order should sort.
    pub fn known_signals(&self) -> impl Iterator<Item = &str> {
        self.rings.keys().map(String::as_str)
    }
}
