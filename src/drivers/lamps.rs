//! Three-lamp signal head driver.
//!
//! One active-HIGH output per lamp. At most one lamp is ever lit: every
//! transition drives the outgoing lamps low before the incoming one goes
//! high, so two aspects are never shown at once, even for one write.

use embedded_hal::digital::OutputPin;

use crate::app::ports::SignalActuator;
use crate::app::state::SignalState;
use crate::error::ActuatorError;
use crate::pins;

struct Lamp<P> {
    pin: P,
    gpio: i32,
}

impl<P: OutputPin> Lamp<P> {
    fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        res.map_err(|_| ActuatorError::GpioWriteFailed { gpio: self.gpio })
    }
}

pub struct LampBank<R: OutputPin, Y: OutputPin, G: OutputPin> {
    red: Lamp<R>,
    yellow: Lamp<Y>,
    green: Lamp<G>,
    lit: SignalState,
}

impl<R: OutputPin, Y: OutputPin, G: OutputPin> LampBank<R, Y, G> {
    /// Take ownership of the three outputs and drive them all low.
    pub fn new(red: R, yellow: Y, green: G) -> Result<Self, ActuatorError> {
        let mut bank = Self {
            red: Lamp { pin: red, gpio: pins::RED_LAMP_GPIO },
            yellow: Lamp { pin: yellow, gpio: pins::YELLOW_LAMP_GPIO },
            green: Lamp { pin: green, gpio: pins::GREEN_LAMP_GPIO },
            lit: SignalState::Off,
        };
        bank.all_off()?;
        Ok(bank)
    }

    /// The aspect currently shown.
    pub fn lit(&self) -> SignalState {
        self.lit
    }

    fn all_off(&mut self) -> Result<(), ActuatorError> {
        self.red.drive(false)?;
        self.yellow.drive(false)?;
        self.green.drive(false)?;
        self.lit = SignalState::Off;
        Ok(())
    }
}

impl<R: OutputPin, Y: OutputPin, G: OutputPin> SignalActuator for LampBank<R, Y, G> {
    fn set_active(&mut self, light: SignalState) -> Result<(), ActuatorError> {
        // Break before make.
        if light != SignalState::Red {
            self.red.drive(false)?;
        }
        if light != SignalState::Yellow {
            self.yellow.drive(false)?;
        }
        if light != SignalState::Green {
            self.green.drive(false)?;
        }
        match light {
            SignalState::Red => self.red.drive(true)?,
            SignalState::Yellow => self.yellow.drive(true)?,
            SignalState::Green => self.green.drive(true)?,
            SignalState::Off => {}
        }
        self.lit = light;
        log::debug!("CYCLE: lamps -> {}", light);
        Ok(())
    }
}

impl<R: OutputPin, Y: OutputPin, G: OutputPin> Drop for LampBank<R, Y, G> {
    fn drop(&mut self) {
        if let Err(e) = self.all_off() {
            log::error!("CYCLE: failed to extinguish lamps on shutdown: {}", e);
        }
    }
}
