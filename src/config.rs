//! System configuration parameters
//!
//! All tunable parameters for the traffic-light controller. Values come
//! from an optional JSON file; missing keys fall back to the defaults.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the sensor poller records when a read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record an empty sample; `/status` reports nulls until the next good read.
    ClearOnFailure,
    /// Leave the previous sample in place.
    KeepLastGood,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Signal cycle ---
    /// Red dwell time (milliseconds)
    pub red_duration_ms: u32,
    /// Green dwell time (milliseconds)
    pub green_duration_ms: u32,
    /// Yellow dwell time (milliseconds)
    pub yellow_duration_ms: u32,
    /// How often the cycle scheduler checks mode and phase (milliseconds)
    pub cycle_check_interval_ms: u32,

    // --- Sensor ---
    /// Sensor read interval (milliseconds)
    pub sensor_poll_interval_ms: u32,
    pub sensor_failure_policy: FailurePolicy,
    /// Simulated DHT22: fail every Nth read (0 = never fail)
    pub sim_sensor_fail_every: u32,

    // --- HTTP ---
    /// Listen address for the control server
    pub listen_addr: String,
    /// Per-connection deadline for receiving a request and sending the reply
    pub request_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            red_duration_ms: 6_000,
            green_duration_ms: 6_000,
            yellow_duration_ms: 2_000,
            cycle_check_interval_ms: 250,

            sensor_poll_interval_ms: 2_000, // DHT22 minimum sampling period
            sensor_failure_policy: FailurePolicy::ClearOnFailure,
            sim_sensor_fail_every: 0,

            listen_addr: "127.0.0.1:8080".into(),
            request_timeout_ms: 2_000,
        }
    }
}

impl SystemConfig {
    /// Load from a JSON file and validate.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.kind()))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.red_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("red_duration_ms must be > 0"));
        }
        if self.green_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("green_duration_ms must be > 0"));
        }
        if self.yellow_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("yellow_duration_ms must be > 0"));
        }
        if self.cycle_check_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("cycle_check_interval_ms must be > 0"));
        }
        if self.sensor_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("sensor_poll_interval_ms must be > 0"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("request_timeout_ms must be > 0"));
        }
        self.listen_socket_addr()?;
        Ok(())
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::ValidationFailed("listen_addr must be ip:port"))
    }

    pub fn cycle_check_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_check_interval_ms as u64)
    }

    pub fn sensor_poll_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_poll_interval_ms as u64)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms as u64)
    }
}
