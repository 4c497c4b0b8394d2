// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of the air conditioner.

use std::fmt;

/// Desired power state as stored in the device shadow.
///
/// The shadow encodes power as an integer: `1` is on, anything else is off.
///
/// # Examples
///
/// ```
/// use aircon_bridge::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!(PowerState::On.code(), 1);
/// assert_eq!(PowerState::from_code(0), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    /// Power is off.
    #[default]
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the display string used in status replies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns the integer code written to the shadow.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Decodes a shadow power code.
    ///
    /// Only `1` means on.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 1 { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
