//! Time-driven polling coordinator: invokes signal providers no more often
//! than their configured cadence.

use std::time::Duration;

use chrono::Utc;

use crate::types::Sample;

/// Seam between the scheduler and platform-specific signal acquisition.
/// Implementations must normalize every value into `[0.0, 1.0]` and report
/// `valid=false` rather than panicking when the underlying facility fails.
pub trait SignalProvider: Send {
    fn id(&self) -> &str;
    fn read(&mut self) -> Sample;
}

struct Entry {
    provider: Box<dyn SignalProvider>,
    interval: Duration,
    last_polled: Option<chrono::DateTime<Utc>>,
}

/// Owns the registered signal providers and their per-signal next-poll
/// timestamps. Does not sleep; the supervisor loop paces calls.
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registers a provider with an initial "last polled" timestamp of
    /// "never," forcing the first `poll()` to fire it.
    pub fn register(&mut self, provider: Box<dyn SignalProvider>, interval: Duration) {
        self.entries.push(Entry { provider, interval, last_polled: None });
    }

    /// Calls `read()` on every provider whose interval has elapsed since
    /// its last poll, in registration order. An interval of zero fires on
    /// every poll.
    pub fn poll(&mut self) -> Vec<Sample> {
        let now = Utc::now();
        let mut samples = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            let due = match entry.last_polled {
                None => true,
                Some(last) => {
                    entry.interval.is_zero()
                        || (now - last).num_milliseconds() >= entry.interval.as_millis() as i64
                }
            };
            if due {
                samples.push(entry.provider.read());
                entry.last_polled = Some(now);
            }
        }
        samples
    }
}
