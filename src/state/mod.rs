// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the cached view of the shadow's desired state, and
//! [`DesiredChange`] is a single field update that is pushed to the shadow
//! and then applied to the cache.
//!
//! # Examples
//!
//! ```
//! use aircon_bridge::state::{DesiredChange, DeviceState};
//!
//! let mut state = DeviceState::default();
//! state.apply(&DesiredChange::temperature(42));
//!
//! assert_eq!(state.target_temperature().value(), 30);
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::DesiredChange;
