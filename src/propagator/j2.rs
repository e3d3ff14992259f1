//! J2-secular propagator: two-body motion plus the secular rates J2 induces
//! in RAAN, argument of perigee and mean anomaly (Vallado 3rd ed. algorithm
//! 64, "perturbed Kepler problem").

use super::Propagate;
use crate::angles::{m_to_ta, ta_to_m};
use crate::constants::{J2, MU_E, R_E};
use crate::elements::{coe2rv, ClassicalElements};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Two-body-plus-J2-secular propagator, fixed at a single osculating element
/// set and epoch.
pub struct J2Secular {
    elements: ClassicalElements,
    epoch: DateTime<Utc>,
    mean_motion_rad_min: f64,
    raan_dot: f64,
    argp_dot: f64,
    mean_anomaly_dot: f64,
}

impl J2Secular {
    /// Builds a propagator from `elements` osculating at `epoch`.
    pub fn new(elements: ClassicalElements, epoch: DateTime<Utc>) -> Self {
        let n = (MU_E / elements.sma_km.powi(3)).sqrt();
        let p = elements.semi_latus_rectum();
        let inc = elements.inc_rad;

        let raan_dot = -(3.0 * n * R_E * R_E * J2) / (2.0 * p * p) * inc.cos();
        let argp_dot = (3.0 * n * R_E * R_E * J2) / (4.0 * p * p) * (4.0 - 5.0 * inc.sin().powi(2));
        let mean_anomaly_secular = (3.0 * n * R_E * R_E * J2) / (4.0 * p * p)
            * (2.0 - 3.0 * inc.sin().powi(2))
            * (1.0 - elements.ecc * elements.ecc).sqrt();

        J2Secular {
            elements,
            epoch,
            mean_motion_rad_min: n * 60.0,
            raan_dot: raan_dot * 60.0,
            argp_dot: argp_dot * 60.0,
            mean_anomaly_dot: (n + mean_anomaly_secular) * 60.0,
        }
    }

    pub fn elements(&self) -> &ClassicalElements {
        &self.elements
    }
}

impl Propagate for J2Secular {
    fn propagate_eci(&self, when_utc: DateTime<Utc>) -> Result<(crate::frames::Eci, crate::frames::Eci)> {
        let dt_min = (when_utc - self.epoch).num_milliseconds() as f64 / 60_000.0;

        let raan = self.elements.raan_rad + self.raan_dot * dt_min;
        let argp = self.elements.argp_rad + self.argp_dot * dt_min;

        let m0 = ta_to_m(self.elements.ta_rad, self.elements.ecc);
        let m = m0 + self.mean_anomaly_dot * dt_min;
        let ta = m_to_ta(m, self.elements.ecc)?;

        Ok(coe2rv(
            MU_E,
            self.elements.semi_latus_rectum(),
            self.elements.ecc,
            self.elements.inc_rad,
            raan,
            argp,
            ta,
        ))
    }

    fn mean_motion(&self) -> f64 {
        self.mean_motion_rad_min
    }
}
