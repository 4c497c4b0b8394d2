// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of the air conditioner.

use std::fmt;

/// Desired operating mode as stored in the device shadow.
///
/// Shadow codes are `1` for heat, `2` for dry and `3` for cool. Any other
/// code, or a missing one, decodes to [`OperatingMode::Cool`].
///
/// # Examples
///
/// ```
/// use aircon_bridge::types::OperatingMode;
///
/// assert_eq!(OperatingMode::Dry.code(), 2);
/// assert_eq!(OperatingMode::from_code(1), OperatingMode::Heat);
/// assert_eq!(OperatingMode::from_code(42), OperatingMode::Cool);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatingMode {
    /// Heating.
    Heat,
    /// Dehumidifying.
    Dry,
    /// Cooling.
    #[default]
    Cool,
}

impl OperatingMode {
    /// All modes in shadow-code order.
    pub const ALL: [Self; 3] = [Self::Heat, Self::Dry, Self::Cool];

    /// Returns the display string used in status replies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Dry => "DRY",
            Self::Cool => "COOL",
        }
    }

    /// Returns the integer code written to the shadow.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Heat => 1,
            Self::Dry => 2,
            Self::Cool => 3,
        }
    }

    /// Decodes a shadow mode code, falling back to cool.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    /// Decodes a shadow mode code without a fallback.
    #[must_use]
    pub const fn try_from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Heat),
            2 => Some(Self::Dry),
            3 => Some(Self::Cool),
            _ => None,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
