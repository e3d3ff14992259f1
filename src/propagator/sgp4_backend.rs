//! SGP4 propagator backend: a thin adapter over the external `sgp4` crate.
//!
//! SGP4 itself is treated as an opaque, off-the-shelf algorithm; this module
//! only owns TLE parsing and the minutes-since-epoch bookkeeping `sgp4`
//! expects.

use super::Propagate;
use crate::error::{Error, Result};
use crate::frames::Eci;
use chrono::{DateTime, Utc};

/// A two-line element set, kept alongside the name line some catalogs carry.
#[derive(Debug, Clone)]
pub struct Tle {
    pub object_name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl Tle {
    pub fn new(object_name: Option<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Tle {
            object_name,
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

/// SGP4 backend, holding a parsed TLE and the constants `sgp4` derives from it.
pub struct Sgp4 {
    tle: Tle,
    elements: sgp4::Elements,
    constants: sgp4::Constants<'static>,
}

impl Sgp4 {
    /// Parses `tle` and precomputes the `sgp4` propagation constants.
    pub fn from_tle(tle: Tle) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(
            tle.object_name.clone(),
            tle.line1.as_bytes(),
            tle.line2.as_bytes(),
        )
        .map_err(|error| Error::Propagation(error.to_string()))?;
        let constants = sgp4::Constants::from_elements(&elements)?;
        Ok(Sgp4 { tle, elements, constants })
    }

    pub fn tle(&self) -> &Tle {
        &self.tle
    }

    /// The TLE epoch, as a UTC instant.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }
}

impl Propagate for Sgp4 {
    fn propagate_eci(&self, when_utc: DateTime<Utc>) -> Result<(Eci, Eci)> {
        let minutes_since_epoch = (when_utc - self.epoch()).num_milliseconds() as f64 / 60_000.0;
        let prediction = self.constants.propagate(minutes_since_epoch)?;
        Ok((Eci(prediction.position), Eci(prediction.velocity)))
    }

    fn mean_motion(&self) -> f64 {
        self.constants.orbit_0.mean_motion
    }
}
