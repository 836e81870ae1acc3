//! Integration tests for the sensor poller feeding `/status`.

use semaforo::app::ports::Clock;
use semaforo::app::state::StateStore;
use semaforo::config::FailurePolicy;
use semaforo::error::SensorError;
use semaforo::http::routes::StatusBody;
use semaforo::sensors::SensorPoller;
use semaforo::sensors::dht::SimulatedDht22;

use super::mock_hw::{FixedClock, ROOM, ScriptedSensor, exchange, get};

fn status_of(store: &StateStore) -> StatusBody {
    serde_json::from_str(exchange(store, &get("/status")).body()).unwrap()
}

#[test]
fn always_failing_sensor_reports_nulls_indefinitely() {
    let store = StateStore::new();
    let mut poller = SensorPoller::new(ScriptedSensor::always_failing(), FailurePolicy::ClearOnFailure);

    for t in 0..1_000 {
        assert_eq!(poller.tick(&store, t), Err(SensorError::Timeout));
        if t % 100 == 0 {
            let s = status_of(&store);
            assert_eq!((s.temp, s.hum, s.last), (None, None, None));
        }
    }
    assert_eq!(poller.consecutive_failures(), 1_000);
}

#[test]
fn good_read_shows_up_in_status() {
    let store = StateStore::new();
    let clock = FixedClock(1_760_000_000);
    let mut poller = SensorPoller::new(ScriptedSensor::new(vec![Ok(ROOM)]), FailurePolicy::ClearOnFailure);
    poller.tick(&store, clock.now_epoch_secs()).unwrap();

    let s = status_of(&store);
    assert_eq!(s.temp, Some(ROOM.temperature_c));
    assert_eq!(s.hum, Some(ROOM.humidity_pct));
    assert_eq!(s.last, Some(1_760_000_000));
}

#[test]
fn clear_on_failure_nulls_a_previous_reading() {
    let store = StateStore::new();
    let mut poller = SensorPoller::new(
        ScriptedSensor::new(vec![Ok(ROOM), Err(SensorError::BadChecksum)]),
        FailurePolicy::ClearOnFailure,
    );
    poller.tick(&store, 1).unwrap();
    let _ = poller.tick(&store, 3);
    assert_eq!(status_of(&store).temp, None);
}

#[test]
fn keep_last_good_survives_failures() {
    let store = StateStore::new();
    let mut poller = SensorPoller::new(
        ScriptedSensor::new(vec![Ok(ROOM), Err(SensorError::BadChecksum)]),
        FailurePolicy::KeepLastGood,
    );
    poller.tick(&store, 1).unwrap();
    for t in 2..10 {
        let _ = poller.tick(&store, t);
    }
    let s = status_of(&store);
    assert_eq!(s.temp, Some(ROOM.temperature_c));
    assert_eq!(s.last, Some(1));
}

#[test]
fn simulated_dht_with_injected_failures_recovers() {
    let store = StateStore::new();
    let mut poller = SensorPoller::new(SimulatedDht22::new(2), FailurePolicy::ClearOnFailure);

    assert!(poller.tick(&store, 10).is_ok());
    assert_eq!(poller.tick(&store, 12), Err(SensorError::BadChecksum));
    assert!(status_of(&store).temp.is_none());
    assert!(poller.tick(&store, 14).is_ok());
    assert_eq!(status_of(&store).last, Some(14));
}
