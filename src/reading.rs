//! Sensor reading data model.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// A single air-quality observation from one sensor.
///
/// The timestamp keeps the offset it was recorded with, so [`Reading::hour`]
/// reports local hour-of-day for the sensor rather than UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_id: String,
    pub timestamp: DateTime<FixedOffset>,
    pub pm25: f64,
    pub co2: f64,

    // only carried by JSON input; None means not measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ozone: Option<f64>,
}

impl Reading {
    pub fn new(
        sensor_id: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        pm25: f64,
        co2: f64,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp,
            pm25,
            co2,
            no2: None,
            ozone: None,
        }
    }

    /// Hour of day (0..=23) in the timestamp's own offset.
    pub fn hour(&self) -> usize {
        self.timestamp.hour() as usize
    }
}

/// Pollutants that take part in aggregation.
///
/// Declaration order is the evaluation order used for tie-breaking:
/// `Pm25` is always considered before `Co2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Co2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 2] = [Pollutant::Pm25, Pollutant::Co2];

    pub fn name(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Co2 => "co2",
        }
    }

    pub fn value(self, reading: &Reading) -> f64 {
        match self {
            Pollutant::Pm25 => reading.pm25,
            Pollutant::Co2 => reading.co2,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
