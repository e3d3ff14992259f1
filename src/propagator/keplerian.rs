//! Pure two-body Keplerian propagator: a fixed set of classical elements
//! advanced by mean motion alone, with no secular perturbations.

use super::Propagate;
use crate::angles::{m_to_ta, ta_to_m};
use crate::constants::MU_E;
use crate::elements::{coe2rv, ClassicalElements};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Two-body propagator, fixed at a single osculating element set and epoch.
pub struct Keplerian {
    elements: ClassicalElements,
    epoch: DateTime<Utc>,
    mean_motion_rad_min: f64,
}

impl Keplerian {
    /// Builds a propagator from `elements` osculating at `epoch`.
    pub fn new(elements: ClassicalElements, epoch: DateTime<Utc>) -> Self {
        let mean_motion_rad_min = (MU_E / elements.sma_km.powi(3)).sqrt() * 60.0;
        Keplerian {
            elements,
            epoch,
            mean_motion_rad_min,
        }
    }

    pub fn elements(&self) -> &ClassicalElements {
        &self.elements
    }
}

impl Propagate for Keplerian {
    fn propagate_eci(&self, when_utc: DateTime<Utc>) -> Result<(crate::frames::Eci, crate::frames::Eci)> {
        let dt_min = (when_utc - self.epoch).num_milliseconds() as f64 / 60_000.0;
        let m0 = ta_to_m(self.elements.ta_rad, self.elements.ecc);
        let m = m0 + self.mean_motion_rad_min * dt_min;
        let ta = m_to_ta(m, self.elements.ecc)?;

        Ok(coe2rv(
            MU_E,
            self.elements.semi_latus_rectum(),
            self.elements.ecc,
            self.elements.inc_rad,
            self.elements.raan_rad,
            self.elements.argp_rad,
            ta,
        ))
    }

    fn mean_motion(&self) -> f64 {
        self.mean_motion_rad_min
    }
}
