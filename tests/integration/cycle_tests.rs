//! Integration tests for the scheduler driving real lamp drivers while
//! control requests arrive.

use std::time::Duration;

use semaforo::app::state::{OperatingMode, SignalState, StateStore};
use semaforo::drivers::lamps::LampBank;
use semaforo::drivers::sim_pin::SimPin;
use semaforo::pins;
use semaforo::scheduler::{CycleDurations, CycleScheduler};

use super::mock_hw::{RecordingLamps, exchange, post_control};

const TICK: Duration = Duration::from_millis(250);

fn durations() -> CycleDurations {
    CycleDurations {
        red: Duration::from_secs(4),
        green: Duration::from_secs(3),
        yellow: Duration::from_secs(1),
    }
}

fn run_for(
    sched: &mut CycleScheduler,
    total: Duration,
    store: &StateStore,
    lamps: &mut RecordingLamps,
) {
    let ticks = total.as_millis() / TICK.as_millis();
    for _ in 0..ticks {
        sched.tick(TICK, store, lamps).unwrap();
    }
}

#[test]
fn auto_cycle_visits_each_lamp_in_order() {
    let store = StateStore::new();
    let mut lamps = RecordingLamps::new();
    let mut sched = CycleScheduler::new(durations());
    sched.start(&store, &mut lamps).unwrap();

    run_for(&mut sched, durations().period() * 2, &store, &mut lamps);
    use SignalState::{Green, Red, Yellow};
    assert_eq!(lamps.calls, vec![Red, Green, Yellow, Red, Green, Yellow, Red]);
}

#[test]
fn manual_override_over_http_reaches_the_lamps_and_holds() {
    let store = StateStore::new();
    let mut lamps = RecordingLamps::new();
    let mut sched = CycleScheduler::new(durations());
    sched.start(&store, &mut lamps).unwrap();

    exchange(&store, &post_control(r#"{"mode":"manual","light":"yellow"}"#));
    run_for(&mut sched, Duration::from_secs(30), &store, &mut lamps);

    assert_eq!(lamps.lit(), Some(SignalState::Yellow));
    assert_eq!(store.snapshot().light, SignalState::Yellow);
}

#[test]
fn light_set_while_auto_is_transient() {
    let store = StateStore::new();
    let mut lamps = RecordingLamps::new();
    let mut sched = CycleScheduler::new(durations());
    sched.start(&store, &mut lamps).unwrap();

    exchange(&store, &post_control(r#"{"light":"green"}"#));
    assert_eq!(store.snapshot().light, SignalState::Green);

    sched.tick(TICK, &store, &mut lamps).unwrap();
    assert_eq!(store.snapshot().light, SignalState::Red);
    assert_eq!(lamps.calls, vec![SignalState::Red]);
}

#[test]
fn back_to_auto_resumes_from_manual_light() {
    let store = StateStore::new();
    let mut lamps = RecordingLamps::new();
    let mut sched = CycleScheduler::new(durations());
    sched.start(&store, &mut lamps).unwrap();

    exchange(&store, &post_control(r#"{"mode":"manual","light":"green"}"#));
    run_for(&mut sched, Duration::from_secs(10), &store, &mut lamps);
    exchange(&store, &post_control(r#"{"mode":"auto"}"#));

    // Green gets its full dwell, counted from the first tick in auto.
    run_for(&mut sched, durations().green, &store, &mut lamps);
    assert_eq!(store.snapshot().light, SignalState::Green);
    run_for(&mut sched, TICK, &store, &mut lamps);
    assert_eq!(store.snapshot().light, SignalState::Yellow);
}

#[test]
fn set_mode_auto_twice_is_idempotent() {
    let store = StateStore::new();
    store.set_mode(OperatingMode::Auto);
    let once = store.snapshot();
    store.set_mode(OperatingMode::Auto);
    assert_eq!(store.snapshot(), once);
}

#[test]
fn lamp_bank_follows_scheduler() {
    let store = StateStore::new();
    let mut bank = LampBank::new(
        SimPin::new(pins::RED_LAMP_GPIO),
        SimPin::new(pins::YELLOW_LAMP_GPIO),
        SimPin::new(pins::GREEN_LAMP_GPIO),
    )
    .unwrap();
    let mut sched = CycleScheduler::new(durations());
    sched.start(&store, &mut bank).unwrap();
    assert_eq!(bank.lit(), SignalState::Red);

    for _ in 0..(durations().red.as_millis() / TICK.as_millis()) {
        sched.tick(TICK, &store, &mut bank).unwrap();
    }
    assert_eq!(bank.lit(), SignalState::Green);
}
