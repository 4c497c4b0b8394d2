// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Desired device state and its decoding from shadow documents.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::{OperatingMode, PowerState, TargetTemperature};

use super::DesiredChange;

/// Desired state of the air conditioner.
///
/// This mirrors `state.desired` of the device shadow. The shadow service is
/// the source of truth; this struct is the locally cached view of it.
///
/// # Examples
///
/// ```
/// use aircon_bridge::state::{DesiredChange, DeviceState};
/// use aircon_bridge::types::PowerState;
///
/// let mut state = DeviceState::default();
/// assert!(state.apply(&DesiredChange::power_on()));
/// assert_eq!(state.power(), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    power: PowerState,
    mode: OperatingMode,
    target_temperature: TargetTemperature,
}

impl DeviceState {
    /// Creates a device state from its parts.
    #[must_use]
    pub const fn new(
        power: PowerState,
        mode: OperatingMode,
        target_temperature: TargetTemperature,
    ) -> Self {
        Self {
            power,
            mode,
            target_temperature,
        }
    }

    /// Decodes the desired state from a full shadow document.
    ///
    /// Expects `state.desired.power` and `state.desired.temp` to be present
    /// as integers (JSON numbers or numeric strings). A missing or
    /// unrecognized `mode` decodes to [`OperatingMode::Cool`]. The
    /// temperature is clamped to 20-30 before it is cached.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if `state.desired`, `power` or
    /// `temp` is absent, and `ParseError::InvalidValue` if one of them is
    /// not an integer.
    pub fn from_shadow(document: &Value) -> Result<Self, ParseError> {
        let desired = document
            .get("state")
            .and_then(|state| state.get("desired"))
            .filter(|desired| desired.is_object())
            .ok_or_else(|| ParseError::MissingField("state.desired".to_string()))?;

        let power = desired_code(desired, "power")?
            .ok_or_else(|| ParseError::MissingField("state.desired.power".to_string()))?;
        let temp = desired_code(desired, "temp")?
            .ok_or_else(|| ParseError::MissingField("state.desired.temp".to_string()))?;

        let mode = match desired_code(desired, "mode") {
            Ok(Some(code)) => OperatingMode::try_from_code(code).unwrap_or_else(|| {
                tracing::warn!(code, "Unrecognized mode code in shadow, using COOL");
                OperatingMode::Cool
            }),
            Ok(None) => {
                tracing::warn!("Shadow has no desired mode, using COOL");
                OperatingMode::Cool
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable mode in shadow, using COOL");
                OperatingMode::Cool
            }
        };

        Ok(Self {
            power: PowerState::from_code(power),
            mode,
            target_temperature: TargetTemperature::clamped(temp),
        })
    }

    /// Returns the desired power state.
    #[must_use]
    pub const fn power(&self) -> PowerState {
        self.power
    }

    /// Returns the desired operating mode.
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Returns the desired target temperature.
    #[must_use]
    pub const fn target_temperature(&self) -> TargetTemperature {
        self.target_temperature
    }

    /// Applies a change to this state.
    ///
    /// Returns `true` if the state actually changed.
    pub fn apply(&mut self, change: &DesiredChange) -> bool {
        let before = *self;
        match *change {
            DesiredChange::Power(state) => self.power = state,
            DesiredChange::Mode(mode) => self.mode = mode,
            DesiredChange::Temperature(temp) => self.target_temperature = temp,
        }
        before != *self
    }
}

/// Reads an integer field of the desired state.
///
/// `null` is treated the same as absent.
fn desired_code(desired: &Value, field: &str) -> Result<Option<i64>, ParseError> {
    let invalid = |message: String| ParseError::InvalidValue {
        field: format!("state.desired.{field}"),
        message,
    };

    match desired.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                // Integral floats such as 25.0
                #[allow(clippy::cast_possible_truncation)]
                let code = f as i64;
                Ok(Some(code))
            } else {
                Err(invalid(format!("{n} is not an integer")))
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| invalid(format!("{s:?}: {e}"))),
        Some(other) => Err(invalid(format!("unexpected value {other}"))),
    }
}
