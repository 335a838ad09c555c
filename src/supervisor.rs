//! Thin orchestrator: advance fault schedule, poll signals, apply the fault
//! stage, log, process, drain transitions, sleep.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::defaults;
use crate::engine::Engine;
use crate::fault::FaultStage;
use crate::scheduler::Scheduler;
use crate::sink::EventSink;
use crate::types::FaultConfig;

pub struct Supervisor {
    scheduler: Scheduler,
    fault_stage: FaultStage,
    engine: Engine,
    sink: EventSink,
    fault_configs: Vec<FaultConfig>,
    start: std::time::Instant,
}

impl Supervisor {
    pub fn new(
        scheduler: Scheduler,
        engine: Engine,
        sink: EventSink,
        fault_configs: Vec<FaultConfig>,
    ) -> Self {
        Self {
            scheduler,
            fault_stage: FaultStage::new(),
            engine,
            sink,
            fault_configs,
            start: std::time::Instant::now(),
        }
    }

    /// Runs the tick loop until `cancel` fires, then emits a final
    /// aggregate-state line and returns.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            self.tick();
            tokio::select! {
                () = tokio::time::sleep(Duration::from_millis(defaults::SUPERVISOR_TICK_MS)) => {}
                () = cancel.cancelled() => {}
            }
        }
        info!(aggregate = %self.engine.aggregate_state(), "shutting down");
    }

    /// One supervisor tick, per §4.8. Exposed standalone for tests that
    /// want to drive the loop without sleeping.
    pub fn tick(&mut self) {
        let elapsed_s = self.start.elapsed().as_secs_f64();

        for config in &mut self.fault_configs {
            if !config.triggered && elapsed_s >= config.trigger_after_seconds {
                self.fault_stage.inject(config.signal_id.clone(), config.fault_kind, config.parameters);
                config.triggered = true;
                config.injected_at = Some(elapsed_s);
                self.sink.fault(&config.signal_id, config.fault_kind, config.parameters.injected_value);
            }
            if config.triggered
                && !config.cleared
                && config.duration_seconds > 0.0
                && elapsed_s >= config.injected_at.unwrap_or(0.0) + config.duration_seconds
            {
                self.fault_stage.clear(&config.signal_id);
                config.cleared = true;
            }
        }

        let raw = self.scheduler.poll();
        let samples: Vec<_> = raw.into_iter().map(|s| self.fault_stage.apply(s)).collect();

        for sample in &samples {
            self.sink.reading(&sample.signal_id, sample.value, sample.valid);
        }

        let transitions_before = self.engine.recent_transitions().len();
        self.engine.process(samples);

        for transition in &self.engine.recent_transitions()[transitions_before..] {
            self.sink.transition(&transition.signal_id, transition.from, transition.to, &transition.reason);
        }

        for violation in self.engine.last_violations() {
            self.sink.rule_violation(&violation.rule_name, &violation.signal_id, &violation.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SyntheticProvider;
    use crate::rules::ThresholdRule;
    use crate::types::Severity;
    use crate::window::MeasurementWindow;

    fn sink_to_tempdir() -> (tempfile::TempDir, EventSink) {
        let dir = tempfile::tempdir().unwrap();
        let sink = EventSink::new(Some(&dir.path().join("events.jsonl"))).unwrap();
        (dir, sink)
    }

    #[test]
    fn one_tick_with_clean_reading_reaches_ok() {
        let mut scheduler = Scheduler::new();
        scheduler.register(
            Box::new(SyntheticProvider::new("x", vec![(0.5, true)], true)),
            Duration::ZERO,
        );
        let mut engine = Engine::new(MeasurementWindow::new(8).unwrap());
        engine.add_rule(Box::new(ThresholdRule::scalar(0.0, 1.0, Severity::Degraded, "")));
        let (_dir, sink) = sink_to_tempdir();
        let mut supervisor = Supervisor::new(scheduler, engine, sink, vec![]);

        supervisor.tick();
        assert_eq!(supervisor.engine.sensor_state("x").to_string(), "OK");
    }

    #[test]
    fn scheduled_fault_injects_after_trigger_elapses() {
        let mut scheduler = Scheduler::new();
        scheduler.register(
            Box::new(SyntheticProvider::new("x", vec![(0.5, true)], true)),
            Duration::ZERO,
        );
        let engine = Engine::new(MeasurementWindow::new(8).unwrap());
        let (_dir, sink) = sink_to_tempdir();
        let config = FaultConfig {
            signal_id: "x".to_string(),
            fault_kind: crate::types::FaultKind::InterfaceFailure,
            parameters: crate::types::FaultParameters::default(),
            trigger_after_seconds: 0.0,
            duration_seconds: 0.0,
            triggered: false,
            cleared: false,
            injected_at: None,
        };
        let mut supervisor = Supervisor::new(scheduler, engine, sink, vec![config]);
        supervisor.tick();
        assert!(supervisor.fault_configs[0].triggered);
        assert!(supervisor.fault_stage.has_fault("x"));
    }
}
