//! GPIO pin assignments for the traffic-light board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Signal lamps (one LED + resistor per lamp, active HIGH)
// ---------------------------------------------------------------------------

pub const RED_LAMP_GPIO: i32 = 12;
pub const YELLOW_LAMP_GPIO: i32 = 13;
pub const GREEN_LAMP_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Environmental sensor
// ---------------------------------------------------------------------------

/// DHT22 single-wire data line (external 10 kΩ pull-up).
pub const DHT_DATA_GPIO: i32 = 15;
