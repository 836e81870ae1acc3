//! Port traits: the hexagonal boundary between the controller core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CycleScheduler / SensorPoller
//! ```
//!
//! Driven adapters (lamps, sensor, clock) implement these traits. The
//! scheduler and poller consume them via generics, so the core never
//! touches hardware directly and is testable with mocks.

use crate::error::{ActuatorError, SensorError};

use super::state::SignalState;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → lamps)
// ───────────────────────────────────────────────────────────────

/// Drives the three signal lamps.
pub trait SignalActuator {
    /// Light exactly the lamp for `light` and extinguish the others.
    /// `SignalState::Off` extinguishes all three.
    ///
    /// An error here is fatal; callers do not retry.
    fn set_active(&mut self, light: SignalState) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (environment → domain)
// ───────────────────────────────────────────────────────────────

/// One raw temperature/humidity measurement, before timestamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Produces a fresh reading on every call. No caching.
pub trait SensorReader {
    fn sample(&mut self) -> Result<Reading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source used to stamp sensor samples.
pub trait Clock {
    /// Seconds since the Unix epoch.
    fn now_epoch_secs(&self) -> u64;
}

impl<T: SignalActuator + ?Sized> SignalActuator for &mut T {
    fn set_active(&mut self, light: SignalState) -> Result<(), ActuatorError> {
        (**self).set_active(light)
    }
}

impl<T: SensorReader + ?Sized> SensorReader for &mut T {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        (**self).sample()
    }
}
