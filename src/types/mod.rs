// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for air conditioner control.
//!
//! Each type maps one field of the device shadow's desired state to a
//! type-safe representation.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off (`power` field, 1/0)
//! - [`OperatingMode`] - Heat/Dry/Cool (`mode` field, 1/2/3)
//! - [`TargetTemperature`] - Set point in °C, always within 20-30 (`temp` field)

mod mode;
mod power;
mod temperature;

pub use mode::OperatingMode;
pub use power::PowerState;
pub use temperature::TargetTemperature;
