//! Actuator drivers and simulated peripherals.
//!
//! | Driver    | Implements       | Drives                         |
//! |-----------|------------------|--------------------------------|
//! | `lamps`   | `SignalActuator` | three `embedded_hal` outputs   |
//! | `sim_pin` | `OutputPin`      | in-memory level (host builds)  |

pub mod lamps;
pub mod sim_pin;
