//! Integration tests for the Runner → Zone → ValvePort sweep.

use std::time::Duration;

use irrigator::app::events::ZoneEvent;
use irrigator::config::RunnerSettings;
use irrigator::runner::Runner;
use irrigator::zone::Zone;

use crate::mock_hw::{ManualClock, MemStore, MockValve, RecordingSink, zone_config};

type TestRunner = Runner<MockValve, ManualClock, MemStore, RecordingSink>;

fn settings() -> RunnerSettings {
    RunnerSettings {
        zone_gap: Duration::ZERO,
        ..RunnerSettings::default()
    }
}

fn make_runner(zones: Vec<Zone<MockValve>>) -> (TestRunner, ManualClock, MemStore) {
    let clock = ManualClock::new();
    let store = MemStore::new();
    let runner = Runner::new(
        zones,
        clock.clone(),
        store.clone(),
        RecordingSink::default(),
        settings(),
    );
    (runner, clock, store)
}

fn zone(name: &str, interval: u64, supply: u64, cap: u64) -> Zone<MockValve> {
    Zone::new(zone_config(name, interval, supply, cap), MockValve::new())
}

// ── Sweep semantics ───────────────────────────────────────────

#[test]
fn sweep_visits_every_zone_even_after_one_acts() {
    let (mut runner, _clock, _store) = make_runner(vec![
        zone("a-lawn", 300, 30, 600),
        zone("b-beds", 300, 45, 600),
        zone("c-pots", 300, 15, 600),
    ]);

    assert!(runner.sweep());

    for (name, expected) in [("a-lawn", 30), ("b-beds", 45), ("c-pots", 15)] {
        let valve = runner.zone(name).unwrap().valve();
        assert_eq!(
            valve.dispensed(),
            vec![Duration::from_secs(expected)],
            "zone {name} should have watered in the first sweep"
        );
    }
}

#[test]
fn idle_sweep_does_not_persist() {
    let (mut runner, clock, store) = make_runner(vec![zone("lawn", 3600, 30, 600)]);

    assert!(runner.run_once());
    assert_eq!(store.saves.get(), 1);

    clock.advance(Duration::from_secs(300));
    assert!(!runner.run_once(), "interval not due yet");
    assert_eq!(store.saves.get(), 1, "idle sweep must not rewrite status");
    assert_eq!(runner.sweep_count(), 2);
}

#[test]
fn disabled_zone_never_waters() {
    let (mut runner, clock, store) = make_runner(vec![zone("manual", 0, 0, 600)]);
    for _ in 0..5 {
        assert!(!runner.run_once());
        clock.advance(Duration::from_secs(3600));
    }
    assert!(runner.zone("manual").unwrap().valve().calls.is_empty());
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn interval_zone_waters_on_cadence() {
    let (mut runner, clock, _store) = make_runner(vec![zone("lawn", 600, 20, 3600)]);

    let mut fired = 0;
    // Poll every 5 minutes for 1 hour.
    for _ in 0..12 {
        if runner.sweep() {
            fired += 1;
        }
        clock.advance(Duration::from_secs(300));
    }
    assert_eq!(fired, 6);
    assert_eq!(runner.zone("lawn").unwrap().state().ledger.len(), 6);
}

// ── Daily cap ─────────────────────────────────────────────────

#[test]
fn cap_blocks_until_window_rolls_forward() {
    let (mut runner, clock, _store) = make_runner(vec![zone("beds", 3600, 1800, 3600)]);

    // Two supplies one hour apart fill the cap.
    assert!(runner.sweep());
    clock.advance(Duration::from_secs(3600));
    assert!(runner.sweep());

    // Every hourly poll afterwards is declined, and keeps being retried,
    // up to and including exactly 24 h after the first supply.
    for _ in 0..23 {
        clock.advance(Duration::from_secs(3600));
        assert!(!runner.sweep());
    }
    let last_interval = runner.zone("beds").unwrap().state().last_intervaled_supply;

    // Once the first supply is strictly older than 24 h it drops out.
    clock.advance(Duration::from_secs(3600));
    assert!(runner.sweep());
    let state = runner.zone("beds").unwrap().state();
    assert!(state.last_intervaled_supply > last_interval);
    assert_eq!(
        runner.zone("beds").unwrap().valve().dispensed().len(),
        3
    );
}

#[test]
fn cap_rejection_is_reported_to_sink() {
    let (mut runner, clock, _store) = make_runner(vec![zone("beds", 60, 60, 60)]);
    assert!(runner.sweep());
    clock.advance(Duration::from_secs(120));
    assert!(!runner.sweep());

    let cap_events: Vec<_> = runner
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, ZoneEvent::CapReached { .. }))
        .collect();
    assert_eq!(cap_events.len(), 1);
    assert_eq!(cap_events[0].zone(), "beds");
}

#[test]
fn shortened_window_from_settings_applies() {
    let clock = ManualClock::new();
    let short = RunnerSettings {
        zone_gap: Duration::ZERO,
        rolling_window: Duration::from_secs(120),
        ..RunnerSettings::default()
    };
    let zones = irrigator::runner::build_zones(
        vec![zone_config("bench", 60, 30, 30)],
        &short,
        |_| Ok(MockValve::new()),
    )
    .unwrap();
    let mut runner = Runner::new(
        zones,
        clock.clone(),
        MemStore::new(),
        RecordingSink::default(),
        short,
    );

    assert!(runner.sweep());
    clock.advance(Duration::from_secs(61));
    assert!(!runner.sweep(), "cap still full inside the 2 min window");
    clock.advance(Duration::from_secs(60));
    assert!(runner.sweep());
}

// ── Persistence failures ──────────────────────────────────────

#[test]
fn persist_failure_is_not_fatal_and_retried() {
    let (mut runner, clock, store) = make_runner(vec![zone("lawn", 300, 10, 600)]);
    store.fail_saves.set(true);

    assert!(runner.run_once());
    assert!(store.snapshot().is_none());

    store.fail_saves.set(false);
    clock.advance(Duration::from_secs(300));
    assert!(runner.run_once());

    let saved = store.snapshot().expect("second active sweep persists");
    assert_eq!(saved["lawn"].events.len(), 2);
}
