//! Autonomous signal-cycle scheduler.
//!
//! Runs the fixed RED → GREEN → YELLOW → RED sequence while the mode is
//! `Auto`, and goes dormant in `Manual`. It is also the only component
//! that drives the lamps: after every tick the stored light is mirrored to
//! the [`SignalActuator`] if it changed.
//!
//! ```text
//!  ┌─────┐  dwell(red)  ┌───────┐ dwell(green) ┌────────┐
//!  │ RED │ ───────────▶ │ GREEN │ ───────────▶ │ YELLOW │
//!  └─────┘              └───────┘              └────────┘
//!     ▲                 dwell(yellow)               │
//!     └─────────────────────────────────────────────┘
//! ```
//!
//! ## Resumption policy
//!
//! When the mode flips back to `Auto` the scheduler resumes from whatever
//! light is lit at that moment, with a fresh phase timer. A stored `Off`
//! resumes as `Red`.

use std::time::{Duration, Instant};

use log::info;

use crate::app::ports::SignalActuator;
use crate::app::state::{OperatingMode, SignalState, StateStore};
use crate::config::SystemConfig;
use crate::error::ActuatorError;

/// Dwell time for each lamp of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDurations {
    pub red: Duration,
    pub green: Duration,
    pub yellow: Duration,
}

impl CycleDurations {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            red: Duration::from_millis(config.red_duration_ms as u64),
            green: Duration::from_millis(config.green_duration_ms as u64),
            yellow: Duration::from_millis(config.yellow_duration_ms as u64),
        }
    }

    pub fn dwell(&self, phase: SignalState) -> Duration {
        match phase {
            SignalState::Red | SignalState::Off => self.red,
            SignalState::Green => self.green,
            SignalState::Yellow => self.yellow,
        }
    }

    /// Length of one full cycle.
    pub fn period(&self) -> Duration {
        self.red + self.green + self.yellow
    }
}

/// The next lamp in the autonomous cycle.
pub fn next_phase(phase: SignalState) -> SignalState {
    match phase {
        SignalState::Red | SignalState::Off => SignalState::Green,
        SignalState::Green => SignalState::Yellow,
        SignalState::Yellow => SignalState::Red,
    }
}

/// Tick-driven cycle state machine.
///
/// Time only moves when [`tick`](Self::tick) is called with an elapsed
/// duration, so tests can drive it without a clock.
pub struct CycleScheduler {
    durations: CycleDurations,
    /// Lamp the cycle is currently dwelling on.
    phase: SignalState,
    /// Time spent in `phase` so far.
    in_phase: Duration,
    /// True while the mode is `Manual`.
    suspended: bool,
    /// Last light pushed to the actuator.
    applied: Option<SignalState>,
}

impl CycleScheduler {
    pub fn new(durations: CycleDurations) -> Self {
        Self {
            durations,
            phase: SignalState::Red,
            in_phase: Duration::ZERO,
            suspended: false,
            applied: None,
        }
    }

    pub fn phase(&self) -> SignalState {
        self.phase
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Adopt the stored light as the starting phase and drive the lamps to it.
    pub fn start(
        &mut self,
        store: &StateStore,
        actuator: &mut impl SignalActuator,
    ) -> Result<(), ActuatorError> {
        let snap = store.snapshot();
        self.phase = resume_phase(snap.light);
        self.in_phase = Duration::ZERO;
        self.suspended = snap.mode == OperatingMode::Manual;
        info!(
            "CYCLE: start mode={} light={} (red={:?} green={:?} yellow={:?})",
            snap.mode, snap.light, self.durations.red, self.durations.green, self.durations.yellow
        );
        self.sync_actuator(store, actuator)
    }

    /// Advance the cycle by `elapsed` and mirror the result to the lamps.
    ///
    /// At most one phase change per tick. Overshoot past the dwell time is
    /// carried into the next phase.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        store: &StateStore,
        actuator: &mut impl SignalActuator,
    ) -> Result<(), ActuatorError> {
        let snap = store.snapshot();

        match snap.mode {
            OperatingMode::Manual => {
                if !self.suspended {
                    info!("CYCLE: manual mode, suspended at {}", snap.light);
                    self.suspended = true;
                }
            }
            OperatingMode::Auto => {
                if self.suspended {
                    self.suspended = false;
                    self.phase = resume_phase(snap.light);
                    self.in_phase = Duration::ZERO;
                    info!("CYCLE: auto mode, resuming at {}", self.phase);
                } else {
                    self.in_phase += elapsed;
                    let dwell = self.durations.dwell(self.phase);
                    if self.in_phase >= dwell {
                        self.in_phase -= dwell;
                        let next = next_phase(self.phase);
                        info!("CYCLE: {} -> {}", self.phase, next);
                        self.phase = next;
                    }
                }

                // Also reverts a manual SetLight issued while in Auto.
                if snap.light != self.phase
                    && !store.set_light_if(OperatingMode::Auto, self.phase)
                {
                    // Mode flipped to Manual between snapshot and write.
                    self.suspended = true;
                }
            }
        }

        self.sync_actuator(store, actuator)
    }

    fn sync_actuator(
        &mut self,
        store: &StateStore,
        actuator: &mut impl SignalActuator,
    ) -> Result<(), ActuatorError> {
        let light = store.snapshot().light;
        if self.applied != Some(light) {
            actuator.set_active(light)?;
            self.applied = Some(light);
        }
        Ok(())
    }

    /// Run forever on `check_interval`. Returns only when the actuator fails.
    pub async fn run(
        mut self,
        store: &StateStore,
        mut actuator: impl SignalActuator,
        check_interval: Duration,
    ) -> Result<(), ActuatorError> {
        self.start(store, &mut actuator)?;
        let mut last = Instant::now();
        loop {
            async_io_mini::Timer::after(check_interval).await;
            let now = Instant::now();
            self.tick(now - last, store, &mut actuator)?;
            last = now;
        }
    }
}

fn resume_phase(light: SignalState) -> SignalState {
    match light {
        SignalState::Off => SignalState::Red,
        other => other,
    }
}
