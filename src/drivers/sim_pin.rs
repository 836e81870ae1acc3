//! In-memory GPIO output for host builds.
//!
//! Stands in for a board pin behind the same `embedded_hal` trait the
//! lamp driver is written against. Level changes are logged at trace.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

#[derive(Debug)]
pub struct SimPin {
    gpio: i32,
    high: bool,
}

impl SimPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Last level written (`true` = HIGH).
    pub fn level(&self) -> bool {
        self.high
    }

    fn write(&mut self, high: bool) {
        if self.high != high {
            log::trace!("GPIO{} -> {}", self.gpio, if high { "HIGH" } else { "LOW" });
        }
        self.high = high;
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.write(true);
        Ok(())
    }
}
