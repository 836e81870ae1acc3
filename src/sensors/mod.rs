//! Sensor subsystem: the periodic [`SensorPoller`] and the DHT22 reader.
//!
//! The poller calls its [`SensorReader`] once per tick and writes the
//! result into the [`StateStore`]. A failed read is never retried in the
//! same tick; the next tick is the retry, so the retry rate is bounded by
//! the poll interval.

pub mod dht;

use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::app::ports::{Clock, Reading, SensorReader};
use crate::app::state::{SensorSample, StateStore};
use crate::config::FailurePolicy;
use crate::error::SensorError;

/// DHT22 measurement envelope.
const TEMP_MIN_C: f32 = -40.0;
const TEMP_MAX_C: f32 = 80.0;
const HUMIDITY_MIN_PCT: f32 = 0.0;
const HUMIDITY_MAX_PCT: f32 = 100.0;

/// Reject readings the sensor cannot physically produce.
pub fn check_plausible(reading: Reading) -> Result<Reading, SensorError> {
    let t_ok = reading.temperature_c.is_finite()
        && (TEMP_MIN_C..=TEMP_MAX_C).contains(&reading.temperature_c);
    let h_ok = reading.humidity_pct.is_finite()
        && (HUMIDITY_MIN_PCT..=HUMIDITY_MAX_PCT).contains(&reading.humidity_pct);
    if t_ok && h_ok {
        Ok(reading)
    } else {
        Err(SensorError::OutOfRange)
    }
}

/// Samples the sensor and records into the store, one read per tick.
pub struct SensorPoller<R> {
    reader: R,
    policy: FailurePolicy,
    /// Failures since the last good read.
    consecutive_failures: u32,
}

impl<R: SensorReader> SensorPoller<R> {
    pub fn new(reader: R, policy: FailurePolicy) -> Self {
        Self {
            reader,
            policy,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One poll: read once, record the outcome, never retry.
    pub fn tick(&mut self, store: &StateStore, now_epoch_secs: u64) -> Result<SensorSample, SensorError> {
        match self.reader.sample().and_then(check_plausible) {
            Ok(reading) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "SENSOR: recovered after {} failed read(s)",
                        self.consecutive_failures
                    );
                    self.consecutive_failures = 0;
                }
                let sample = SensorSample {
                    temperature_c: Some(reading.temperature_c),
                    humidity_pct: Some(reading.humidity_pct),
                    captured_at: Some(now_epoch_secs),
                };
                store.record_sample(sample);
                debug!(
                    "SENSOR: T={:.1}\u{00b0}C RH={:.1}%",
                    reading.temperature_c, reading.humidity_pct
                );
                Ok(sample)
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == 1 {
                    warn!("SENSOR: read failed: {}", e);
                } else {
                    debug!(
                        "SENSOR: read failed: {} ({} in a row)",
                        e, self.consecutive_failures
                    );
                }
                if self.policy == FailurePolicy::ClearOnFailure {
                    store.record_sample(SensorSample::EMPTY);
                }
                Err(e)
            }
        }
    }

    /// Run forever on `interval`. Sensor errors never end the loop.
    pub async fn run(mut self, store: &StateStore, clock: impl Clock, interval: Duration) {
        loop {
            if let Err(e) = self.tick(store, clock.now_epoch_secs()) {
                trace!("SENSOR: {}; next attempt in {:?}", e, interval);
            }
            async_io_mini::Timer::after(interval).await;
        }
    }
}
