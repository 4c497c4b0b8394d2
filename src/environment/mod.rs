// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ambient sensor readings for one room.
//!
//! Readings live in a DynamoDB table, one item per location. Nothing is
//! cached: every accessor fetches the whole item again.

use serde_json::{Map, Value};

use crate::aws::{TableClient, number_attribute};
use crate::error::{Error, ParseError, RemoteError};

/// One ambient sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
    /// Air pressure in hPa.
    pub pressure: f64,
}

impl EnvironmentReading {
    /// Decodes a reading from typed table attributes.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if any of the three fields is missing or not a
    /// number.
    pub fn from_item(item: &Map<String, Value>) -> Result<Self, ParseError> {
        Ok(Self {
            temperature: number_attribute(item, "temperature")?,
            humidity: number_attribute(item, "humidity")?,
            pressure: number_attribute(item, "pressure")?,
        })
    }
}

/// Environment Reader for a fixed location key.
#[derive(Debug, Clone)]
pub struct RoomSensor {
    table: TableClient,
    table_name: String,
    key_name: String,
    key_value: String,
}

impl RoomSensor {
    /// Creates a reader for the item `key_name = key_value` of `table_name`.
    #[must_use]
    pub fn new(
        table: TableClient,
        table_name: impl Into<String>,
        key_name: impl Into<String>,
        key_value: impl Into<String>,
    ) -> Self {
        Self {
            table,
            table_name: table_name.into(),
            key_name: key_name.into(),
            key_value: key_value.into(),
        }
    }

    /// Fetches the latest reading.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` if the request fails, the item does not
    /// exist, or a field is missing.
    pub async fn reading(&self) -> Result<EnvironmentReading, Error> {
        let item = self
            .table
            .get_item(&self.table_name, &self.key_name, &self.key_value)
            .await
            .map_err(Error::RemoteRead)?
            .ok_or_else(|| {
                Error::RemoteRead(RemoteError::Parse(ParseError::MissingField(format!(
                    "Item {}={}",
                    self.key_name, self.key_value
                ))))
            })?;

        let reading = EnvironmentReading::from_item(&item)
            .map_err(|e| Error::RemoteRead(RemoteError::Parse(e)))?;

        tracing::debug!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            pressure = reading.pressure,
            "Fetched environment reading"
        );
        Ok(reading)
    }

    /// Fetches a fresh reading and returns its temperature.
    ///
    /// # Errors
    ///
    /// See [`RoomSensor::reading`].
    pub async fn temperature(&self) -> Result<f64, Error> {
        Ok(self.reading().await?.temperature)
    }

    /// Fetches a fresh reading and returns its humidity.
    ///
    /// # Errors
    ///
    /// See [`RoomSensor::reading`].
    pub async fn humidity(&self) -> Result<f64, Error> {
        Ok(self.reading().await?.humidity)
    }

    /// Fetches a fresh reading and returns its pressure.
    ///
    /// # Errors
    ///
    /// See [`RoomSensor::reading`].
    pub async fn pressure(&self) -> Result<f64, Error> {
        Ok(self.reading().await?.pressure)
    }
}
