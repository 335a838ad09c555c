//! Deterministic demo: drives the full engine pipeline with
//! [`SyntheticProvider`]s instead of real signal readers, so the event
//! stream can be inspected without depending on host state.
//!
//! ```bash
//! ./simulation --ticks 20 --speed 100
//! ```

use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kestrel_core::config::{self, defaults};
use kestrel_core::providers::SyntheticProvider;
use kestrel_core::{Engine, EventSink, MeasurementWindow, Scheduler, Supervisor};

#[derive(Parser, Debug)]
#[command(name = "kestrel-simulation")]
#[command(about = "Deterministic synthetic-signal demo for Kestrel")]
struct Args {
    /// Number of supervisor ticks to run.
    #[arg(long, default_value_t = 20)]
    ticks: u32,

    /// Speed multiplier: `delay_ms = BASE_DELAY_MS / speed`. 0 = no delay.
    #[arg(long, default_value_t = 10)]
    speed: u64,

    /// RNG seed, for reproducible runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const BASE_DELAY_MS: u64 = 500;

/// Builds a gently-drifting sequence around `baseline` with occasional
/// excursions, so a run exercises both steady-state OK and a few
/// DEGRADED/FAILED transitions.
fn synthetic_sequence(rng: &mut StdRng, baseline: f64, ticks: u32) -> Vec<(f64, bool)> {
    (0..ticks)
        .map(|i| {
            if i == ticks / 2 {
                (baseline + 0.4, true) // deliberate excursion mid-run
            } else if i == ticks - 1 {
                (0.0, false) // trailing dropout
            } else {
                let noise: f64 = rng.gen_range(-0.02..0.02);
                ((baseline + noise).clamp(0.0, 1.0), true)
            }
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut scheduler = Scheduler::new();
    scheduler.register(
        Box::new(SyntheticProvider::new(
            defaults::CPU_SIGNAL_ID,
            synthetic_sequence(&mut rng, 0.4, args.ticks),
            false,
        )),
        Duration::ZERO,
    );
    scheduler.register(
        Box::new(SyntheticProvider::new(
            defaults::MEMORY_SIGNAL_ID,
            synthetic_sequence(&mut rng, 0.5, args.ticks),
            false,
        )),
        Duration::ZERO,
    );
    scheduler.register(
        Box::new(SyntheticProvider::new(
            defaults::BATTERY_SIGNAL_ID,
            synthetic_sequence(&mut rng, 0.8, args.ticks),
            false,
        )),
        Duration::ZERO,
    );
    scheduler.register(
        Box::new(SyntheticProvider::new(
            defaults::STORAGE_SIGNAL_ID,
            synthetic_sequence(&mut rng, 0.6, args.ticks),
            false,
        )),
        Duration::ZERO,
    );

    let mut engine = Engine::new(MeasurementWindow::new(defaults::WINDOW_CAPACITY_DEFAULT).unwrap());
    for rule in config::standard_rule_set(defaults::DEFAULT_THRESHOLD) {
        engine.add_rule(rule);
    }
    let sink = EventSink::new(None).expect("stdout-only sink never fails to construct");
    let mut supervisor = Supervisor::new(scheduler, engine, sink, vec![]);

    let delay_ms = if args.speed == 0 { 0 } else { BASE_DELAY_MS / args.speed };
    for _ in 0..args.ticks {
        supervisor.tick();
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
