//! DHT22 temperature/humidity sensor (simulated on host).
//!
//! The real part answers a start pulse on [`DHT_DATA_GPIO`] with a 40-bit
//! frame: 16 bits humidity ×10, 16 bits temperature ×10 (sign in the top
//! bit), 8 bits checksum. This module keeps that frame format so the
//! decode and checksum path is exercised even though the bits are
//! synthesized.
//!
//! [`DHT_DATA_GPIO`]: crate::pins::DHT_DATA_GPIO

use crate::app::ports::{Reading, SensorReader};
use crate::error::SensorError;
use crate::pins::DHT_DATA_GPIO;

/// Decode a 5-byte DHT22 frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::BadChecksum);
    }
    let hum_raw = u16::from_be_bytes([frame[0], frame[1]]);
    let temp_raw = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
    let mut temperature_c = temp_raw as f32 / 10.0;
    if frame[2] & 0x80 != 0 {
        temperature_c = -temperature_c;
    }
    Ok(Reading {
        temperature_c,
        humidity_pct: hum_raw as f32 / 10.0,
    })
}

/// Encode a reading into a DHT22 frame (with valid checksum).
pub fn encode_frame(reading: Reading) -> [u8; 5] {
    let hum = (reading.humidity_pct * 10.0).round() as u16;
    let temp = (reading.temperature_c.abs() * 10.0).round() as u16;
    let [h_hi, h_lo] = hum.to_be_bytes();
    let [mut t_hi, t_lo] = temp.to_be_bytes();
    if reading.temperature_c < 0.0 {
        t_hi |= 0x80;
    }
    let sum = h_hi
        .wrapping_add(h_lo)
        .wrapping_add(t_hi)
        .wrapping_add(t_lo);
    [h_hi, h_lo, t_hi, t_lo, sum]
}

/// Host stand-in for a DHT22: a slow deterministic drift around room
/// conditions, with an optional injected checksum failure every Nth read.
pub struct SimulatedDht22 {
    reads: u32,
    fail_every: u32,
}

impl SimulatedDht22 {
    /// `fail_every = 0` never fails.
    pub fn new(fail_every: u32) -> Self {
        log::info!(
            "SENSOR: simulated DHT22 on GPIO{} (fail_every={})",
            DHT_DATA_GPIO, fail_every
        );
        Self { reads: 0, fail_every }
    }

    fn synthesize(&self) -> Reading {
        let t = self.reads as f32;
        Reading {
            temperature_c: 24.0 + 3.0 * (t / 40.0).sin(),
            humidity_pct: 55.0 + 8.0 * (t / 65.0).cos(),
        }
    }
}

impl SensorReader for SimulatedDht22 {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        self.reads = self.reads.wrapping_add(1);
        let mut frame = encode_frame(self.synthesize());
        if self.fail_every != 0 && self.reads % self.fail_every == 0 {
            frame[4] = frame[4].wrapping_add(1);
        }
        decode_frame(frame)
    }
}
