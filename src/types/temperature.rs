// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.
//!
//! The air conditioner accepts whole-degree set points between 20 and 30 °C.
//! [`TargetTemperature`] can only hold values inside that range.

use std::fmt;

/// Target temperature in whole degrees Celsius (20-30).
///
/// # Examples
///
/// ```
/// use aircon_bridge::types::TargetTemperature;
///
/// assert_eq!(TargetTemperature::clamped(25).value(), 25);
/// assert_eq!(TargetTemperature::clamped(12).value(), 20);
/// assert_eq!(TargetTemperature::clamped(99).value(), 30);
///
/// assert!(TargetTemperature::new(31).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetTemperature(u8);

impl TargetTemperature {
    /// Lowest accepted set point.
    pub const MIN: Self = Self(20);

    /// Highest accepted set point.
    pub const MAX: Self = Self(30);

    /// Creates a target temperature if `value` is within 20-30.
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    /// Creates a target temperature, clamping to 20-30.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        // Within 20..=30, always fits
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let degrees = clamped as u8;
        Self(degrees)
    }

    /// Returns the set point in degrees Celsius.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Iterates over every accepted set point in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl Default for TargetTemperature {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
