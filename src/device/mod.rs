// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air conditioner control through its device shadow.
//!
//! [`AirconClient`] is the single point of truth for the desired power,
//! mode and target temperature of one air conditioner. Setters push a
//! partial desired state to the shadow service and then update a local
//! cache; getters are read-through.
//!
//! # Refresh Policy
//!
//! Every getter ([`AirconClient::power`], [`AirconClient::mode`],
//! [`AirconClient::temperature`]) fetches the shadow again before
//! answering, so the answer reflects changes made by other clients at the
//! cost of one round trip per call. [`AirconClient::refresh`] returns all
//! three fields from a single fetch. [`AirconClient::snapshot`] returns the
//! cached view without any round trip; it can be stale if the shadow was
//! changed out of band since the last read or write.
//!
//! ```no_run
//! use aircon_bridge::aws::{Credentials, ShadowClient, Signer};
//! use aircon_bridge::device::AirconClient;
//! use aircon_bridge::types::OperatingMode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signer = Signer::new(Credentials::new("AKID", "secret"), "ap-northeast-1", "iotdata");
//! let shadow = ShadowClient::new(
//!     "https://data-ats.iot.ap-northeast-1.amazonaws.com",
//!     "aircon",
//!     signer,
//! )?;
//!
//! let aircon = AirconClient::connect(shadow).await?;
//! aircon.power_on().await?;
//! aircon.set_mode(OperatingMode::Cool).await?;
//! let applied = aircon.set_temperature(18).await?;
//! assert_eq!(applied.value(), 20);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::aws::ShadowClient;
use crate::error::{Error, RemoteError};
use crate::state::{DesiredChange, DeviceState};
use crate::types::{OperatingMode, PowerState, TargetTemperature};

/// Device State Client for one air conditioner.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Debug, Clone)]
pub struct AirconClient {
    shadow: Arc<ShadowClient>,
    state: Arc<RwLock<DeviceState>>,
}

impl AirconClient {
    /// Creates a client and fills the cache with the current shadow state.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the shadow cannot be fetched or has
    /// no usable desired state.
    pub async fn connect(shadow: ShadowClient) -> Result<Self, Error> {
        let client = Self {
            shadow: Arc::new(shadow),
            state: Arc::new(RwLock::new(DeviceState::default())),
        };
        client.refresh().await?;
        Ok(client)
    }

    // ========== Setters ==========

    /// Turns the air conditioner on.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteWrite` if the shadow update fails.
    pub async fn power_on(&self) -> Result<(), Error> {
        self.push(DesiredChange::power_on()).await
    }

    /// Turns the air conditioner off.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteWrite` if the shadow update fails.
    pub async fn power_off(&self) -> Result<(), Error> {
        self.push(DesiredChange::power_off()).await
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteWrite` if the shadow update fails.
    pub async fn set_mode(&self, mode: OperatingMode) -> Result<(), Error> {
        self.push(DesiredChange::Mode(mode)).await
    }

    /// Sets the target temperature, clamped to 20-30 °C.
    ///
    /// Returns the value that was actually written.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteWrite` if the shadow update fails.
    pub async fn set_temperature(&self, degrees: i64) -> Result<TargetTemperature, Error> {
        let target = TargetTemperature::clamped(degrees);
        self.push(DesiredChange::Temperature(target)).await?;
        Ok(target)
    }

    // ========== Getters ==========

    /// Returns the desired power state, re-reading the shadow first.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the shadow cannot be fetched.
    pub async fn power(&self) -> Result<PowerState, Error> {
        Ok(self.refresh().await?.power())
    }

    /// Returns the desired operating mode, re-reading the shadow first.
    ///
    /// A missing or unrecognized mode code is reported as
    /// [`OperatingMode::Cool`].
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the shadow cannot be fetched.
    pub async fn mode(&self) -> Result<OperatingMode, Error> {
        Ok(self.refresh().await?.mode())
    }

    /// Returns the target temperature, re-reading the shadow first.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the shadow cannot be fetched.
    pub async fn temperature(&self) -> Result<TargetTemperature, Error> {
        Ok(self.refresh().await?.target_temperature())
    }

    /// Fetches the shadow once and replaces the cache with its desired state.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the shadow cannot be fetched or has
    /// no usable desired state. The cache is left untouched in that case.
    pub async fn refresh(&self) -> Result<DeviceState, Error> {
        let document = self.shadow.get().await.map_err(Error::RemoteRead)?;
        let state = DeviceState::from_shadow(&document)
            .map_err(|e| Error::RemoteRead(RemoteError::Parse(e)))?;

        *self.state.write() = state;
        Ok(state)
    }

    /// Returns the cached state without contacting the shadow service.
    #[must_use]
    pub fn snapshot(&self) -> DeviceState {
        *self.state.read()
    }

    async fn push(&self, change: DesiredChange) -> Result<(), Error> {
        tracing::info!(
            thing = self.shadow.thing_name(),
            field = change.field(),
            value = change.code(),
            "Publishing desired state to shadow"
        );

        self.shadow
            .update(&change.to_patch())
            .await
            .map_err(Error::RemoteWrite)?;

        self.state.write().apply(&change);
        Ok(())
    }
}
