//! Unified error types for the semaforo controller.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! binary's error handling stays uniform. The sub-enums are small and
//! mostly `Copy`; only validation errors carry owned text because they
//! echo the offending value back to the HTTP client.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The environmental sensor could not be read.
    Sensor(SensorError),
    /// A lamp output could not be driven. Fatal.
    Actuator(ActuatorError),
    /// A control request payload was rejected.
    Validation(ValidationError),
    /// Connection-level I/O failure while serving a request.
    Transport(TransportError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Transient read failures. Absorbed by the poller; the next tick retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No response from the sensor within the protocol window.
    Timeout,
    /// Frame received but the checksum did not match.
    BadChecksum,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read timed out"),
            Self::BadChecksum => write!(f, "bad checksum"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A GPIO level write failed on the given pin.
    GpioWriteFailed { gpio: i32 },
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed { gpio } => write!(f, "GPIO{gpio} write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Rejections of a `POST /control` payload. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Request carried no body at all.
    EmptyBody,
    /// Body was not a JSON object of the expected shape.
    Malformed(String),
    /// `mode` was present but not `auto` or `manual`.
    InvalidMode(String),
    /// `light` was present but not `red`, `yellow` or `green`.
    InvalidLight(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "no body"),
            Self::Malformed(msg) => write!(f, "malformed body: {msg}"),
            Self::InvalidMode(v) => write!(f, "invalid mode '{v}' (expected auto or manual)"),
            Self::InvalidLight(v) => {
                write!(f, "invalid light '{v}' (expected red, yellow or green)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Socket read failed.
    Read(std::io::ErrorKind),
    /// Socket write or flush failed.
    Write(std::io::ErrorKind),
    /// Peer closed the connection before a full request arrived.
    ClosedEarly,
    /// Request did not complete within the configured timeout.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(kind) => write!(f, "read failed ({kind})"),
            Self::Write(kind) => write!(f, "write failed ({kind})"),
            Self::ClosedEarly => write!(f, "peer closed before request completed"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    Io(std::io::ErrorKind),
    /// Config file is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Parse(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "cannot read config file ({kind})"),
            Self::Parse(msg) => write!(f, "cannot parse config file: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
