//! Turns an incoming batch of [`Sample`]s into deterministic state updates
//! and transitions.

use std::collections::HashMap;

use chrono::Utc;

use crate::rules::Rule;
use crate::types::{RuleResult, Sample, Severity, StateTransition, SystemState};
use crate::window::MeasurementWindow;

/// Owns the [`MeasurementWindow`] and rule list; the only component that
/// decides per-signal and aggregate [`SystemState`].
pub struct Engine {
    window: MeasurementWindow,
    rules: Vec<Box<dyn Rule>>,
    states: HashMap<String, SystemState>,
    transitions: Vec<StateTransition>,
    /// Every non-OK `RuleResult` produced during the most recent `process`
    /// call, in rule-registration order, for `rule_violation` emission.
    last_violations: Vec<RuleResult>,
}

impl Engine {
    pub fn new(window: MeasurementWindow) -> Self {
        Self {
            window,
            rules: Vec::new(),
            states: HashMap::new(),
            transitions: Vec::new(),
            last_violations: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Pushes each sample into the window, evaluates its signal, and
    /// appends a [`StateTransition`] for every state change.
    pub fn process(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.last_violations.clear();
        for sample in samples {
            let id = sample.signal_id.clone();
            self.window.push(sample);

            let previous = *self.states.entry(id.clone()).or_insert(SystemState::Unknown);
            let new_state = self.evaluate_signal(&id);

            if new_state != previous {
                self.states.insert(id.clone(), new_state);
                self.transitions.push(StateTransition {
                    signal_id: id,
                    from: previous,
                    to: new_state,
                    reason: StateTransition::REASON_RULE_EVALUATION.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Invalid reading trumps rule logic; otherwise runs rules in
    /// registration order, reducing severity with `max`, short-circuiting
    /// on FAILED, and recording every non-OK result for `rule_violation`
    /// emission.
    fn evaluate_signal(&mut self, id: &str) -> SystemState {
        if !self.window.latest(id).valid {
            return SystemState::Failed;
        }

        let mut worst = Severity::Ok;
        for rule in &self.rules {
            let result = rule.evaluate(&self.window, id);
            if result.severity != Severity::Ok {
                self.last_violations.push(result.clone());
            }
            if result.severity > worst {
                worst = result.severity;
            }
            if worst == Severity::Failed {
                break;
            }
        }
        worst.into()
    }

    /// UNKNOWN for never-seen signals.
    pub fn sensor_state(&self, id: &str) -> SystemState {
        self.states.get(id).copied().unwrap_or(SystemState::Unknown)
    }

    /// Worst-wins across all known signals: FAILED > UNKNOWN > DEGRADED > OK.
    /// UNKNOWN with no known signals at all.
    pub fn aggregate_state(&self) -> SystemState {
        self.states
            .values()
            .copied()
            .fold(None, |acc: Option<SystemState>, s| Some(acc.map_or(s, |a| a.worse(s))))
            .unwrap_or(SystemState::Unknown)
    }

    pub fn recent_transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// RuleResults with non-OK severity from the most recent `process` call.
    pub fn last_violations(&self) -> &[RuleResult] {
        &self.last_violations
    }

    pub fn window(&self) -> &MeasurementWindow {
        &self.window
    }
}
