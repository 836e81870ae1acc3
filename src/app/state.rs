//! Shared system state and its single owner, [`StateStore`].
//!
//! Three activities touch the state concurrently: the cycle scheduler,
//! the sensor poller and HTTP request handlers. None of them keep a copy;
//! every read is a [`StateStore::snapshot`] and every write is one
//! closure run inside one critical section.
//!
//! ```text
//!  CycleScheduler ──set_light_if──▶ ┌────────────────┐ ◀──record_sample── SensorPoller
//!                                   │   StateStore   │
//!  ControlServer ───apply/snapshot─▶│ Mutex<RefCell> │
//!                                   └────────────────┘
//! ```

use core::cell::RefCell;
use core::fmt;
use core::str::FromStr;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use super::commands::ControlCommand;

// ───────────────────────────────────────────────────────────────
// Data model
// ───────────────────────────────────────────────────────────────

/// The lamp that is currently lit. Exactly one, or `Off` at shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalState {
    Red,
    Yellow,
    Green,
    Off,
}

impl SignalState {
    /// Lowercase wire name, as used in JSON and on the web page.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses only the three controllable lamps; `off` is not accepted.
impl FromStr for SignalState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            _ => Err(()),
        }
    }
}

/// Who is allowed to change the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// The cycle scheduler owns the light.
    Auto,
    /// The control server owns the light; the scheduler is dormant.
    Manual,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            _ => Err(()),
        }
    }
}

/// Last recorded temperature/humidity reading.
///
/// All fields absent means either "never read" or "last read failed",
/// depending on the poller's failure policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSample {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
    /// Capture time, seconds since the Unix epoch.
    pub captured_at: Option<u64>,
}

impl SensorSample {
    pub const EMPTY: Self = Self {
        temperature_c: None,
        humidity_pct: None,
        captured_at: None,
    };

    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none() && self.humidity_pct.is_none() && self.captured_at.is_none()
    }
}

/// The aggregate record owned by [`StateStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemState {
    pub mode: OperatingMode,
    pub light: SignalState,
    pub sample: SensorSample,
}

impl SystemState {
    /// Power-on state: automatic cycle, red lamp, no reading yet.
    pub const INITIAL: Self = Self {
        mode: OperatingMode::Auto,
        light: SignalState::Red,
        sample: SensorSample::EMPTY,
    };
}

impl Default for SystemState {
    fn default() -> Self {
        Self::INITIAL
    }
}

// ───────────────────────────────────────────────────────────────
// StateStore
// ───────────────────────────────────────────────────────────────

/// Serializes every read and write of [`SystemState`].
///
/// The critical section is a closure, so it cannot span an `.await`.
pub struct StateStore {
    inner: Mutex<CriticalSectionRawMutex, RefCell<SystemState>>,
}

impl StateStore {
    pub const fn new() -> Self {
        Self::with_state(SystemState::INITIAL)
    }

    pub const fn with_state(state: SystemState) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(state)),
        }
    }

    fn update<U>(&self, f: impl FnOnce(&mut SystemState) -> U) -> U {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Immutable copy of the current state.
    pub fn snapshot(&self) -> SystemState {
        self.inner.lock(|cell| *cell.borrow())
    }

    /// Unconditional. Switching to `Auto` leaves the light alone; the
    /// scheduler resumes from it with a fresh phase timer.
    pub fn set_mode(&self, mode: OperatingMode) {
        self.update(|s| s.mode = mode);
    }

    /// Unconditional. In `Auto` the scheduler overwrites this on its next tick.
    pub fn set_light(&self, light: SignalState) {
        self.update(|s| s.light = light);
    }

    /// Writes `light` only while the mode is still `mode`.
    /// Returns whether the write happened.
    pub fn set_light_if(&self, mode: OperatingMode, light: SignalState) -> bool {
        self.update(|s| {
            if s.mode == mode {
                s.light = light;
                true
            } else {
                false
            }
        })
    }

    /// Unconditional overwrite of the last sample.
    pub fn record_sample(&self, sample: SensorSample) {
        self.update(|s| s.sample = sample);
    }

    /// Apply a validated control command: mode first, then light, both in
    /// one critical section. Returns the resulting state.
    pub fn apply(&self, cmd: &ControlCommand) -> SystemState {
        self.update(|s| {
            if let Some(mode) = cmd.mode {
                s.mode = mode;
            }
            if let Some(light) = cmd.light {
                s.light = light;
            }
            *s
        })
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
