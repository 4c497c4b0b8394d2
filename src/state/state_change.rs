// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Desired-state changes.
//!
//! A [`DesiredChange`] is one field of the shadow's desired state. It is
//! both the payload pushed to the shadow service and the update applied to
//! the local [`DeviceState`](super::DeviceState) cache once the push
//! succeeded.
//!
//! # Examples
//!
//! ```
//! use aircon_bridge::state::DesiredChange;
//! use aircon_bridge::types::OperatingMode;
//!
//! let change = DesiredChange::Mode(OperatingMode::Dry);
//! assert_eq!(change.field(), "mode");
//! assert_eq!(
//!     change.to_patch().to_string(),
//!     r#"{"state":{"desired":{"mode":2}}}"#
//! );
//! ```

use serde_json::{Value, json};

use crate::types::{OperatingMode, PowerState, TargetTemperature};

/// A single change to the device's desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredChange {
    /// Power on or off.
    Power(PowerState),
    /// Operating mode.
    Mode(OperatingMode),
    /// Target temperature, already clamped.
    Temperature(TargetTemperature),
}

impl DesiredChange {
    /// Creates a power-on change.
    #[must_use]
    pub const fn power_on() -> Self {
        Self::Power(PowerState::On)
    }

    /// Creates a power-off change.
    #[must_use]
    pub const fn power_off() -> Self {
        Self::Power(PowerState::Off)
    }

    /// Creates a temperature change, clamping `degrees` to 20-30.
    #[must_use]
    pub fn temperature(degrees: i64) -> Self {
        Self::Temperature(TargetTemperature::clamped(degrees))
    }

    /// Returns the shadow field name this change writes.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Mode(_) => "mode",
            Self::Temperature(_) => "temp",
        }
    }

    /// Returns the integer value written to the shadow field.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Power(state) => state.code(),
            Self::Mode(mode) => mode.code(),
            Self::Temperature(temp) => i64::from(temp.value()),
        }
    }

    /// Builds the shadow update document for this change.
    ///
    /// The document is a partial desired state: only the changed field is
    /// present, so the shadow service merges it into the existing state.
    #[must_use]
    pub fn to_patch(&self) -> Value {
        let mut desired = serde_json::Map::new();
        desired.insert(self.field().to_string(), Value::from(self.code()));
        json!({ "state": { "desired": desired } })
    }
}
