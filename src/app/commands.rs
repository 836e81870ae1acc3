//! Inbound control commands.
//!
//! A `POST /control` body is decoded into [`ControlCommand`] here, before
//! anything touches the [`StateStore`](super::state::StateStore).
//! Validation is all-or-nothing: one bad field rejects the whole command.

use serde::Deserialize;

use super::state::{OperatingMode, SignalState};
use crate::error::ValidationError;

/// A validated request to change mode and/or light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlCommand {
    pub mode: Option<OperatingMode>,
    pub light: Option<SignalState>,
}

/// Wire shape of the control body. Strings stay raw so bad values can be
/// reported by name instead of as a generic serde error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawControl {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    light: Option<String>,
}

impl ControlCommand {
    /// Decode and validate a JSON body.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::EmptyBody);
        }

        let raw: RawControl = serde_json::from_slice(body)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;

        let mode = raw
            .mode
            .map(|m| m.parse::<OperatingMode>().map_err(|()| ValidationError::InvalidMode(m)))
            .transpose()?;
        let light = raw
            .light
            .map(|l| l.parse::<SignalState>().map_err(|()| ValidationError::InvalidLight(l)))
            .transpose()?;

        Ok(Self { mode, light })
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.light.is_none()
    }
}
