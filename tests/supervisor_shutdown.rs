//! The supervisor loop exits promptly once its cancellation token fires,
//! without waiting out a full tick interval.

use std::time::Duration;

use kestrel_core::providers::SyntheticProvider;
use kestrel_core::{EventSink, MeasurementWindow, Scheduler, Supervisor};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn cancelled_before_run_exits_immediately() {
    let mut scheduler = Scheduler::new();
    scheduler.register(Box::new(SyntheticProvider::new("x", vec![(0.5, true)], true)), Duration::ZERO);
    let engine = kestrel_core::Engine::new(MeasurementWindow::new(8).unwrap());
    let dir = tempfile::tempdir().unwrap();
    let sink = EventSink::new(Some(&dir.path().join("events.jsonl"))).unwrap();
    let supervisor = Supervisor::new(scheduler, engine, sink, vec![]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(Duration::from_millis(200), supervisor.run(cancel))
        .await
        .expect("run() must exit promptly once already cancelled, not wait out a tick");
}
