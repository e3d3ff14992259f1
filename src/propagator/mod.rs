//! The propagator abstraction (C4): a sum type over SGP4, Keplerian and
//! J2-secular backends, exposing a single trait. All higher-level behavior
//! (ECEF propagation, normal vector, beta angle, eclipse duration, pass and
//! eclipse search) is generic over that trait rather than duplicated per
//! backend, rather than an inheritance hierarchy.

mod j2;
mod keplerian;
mod sgp4_backend;

pub use j2::J2Secular;
pub use keplerian::Keplerian;
pub use sgp4_backend::{Sgp4, Tle};

use crate::constants::R_E;
use crate::eclipse::EclipseIter;
use crate::elements::rv2coe;
use crate::error::{Error, Result};
use crate::frames::{ecef_to_eci, eci_to_ecef, Ecef, Eci};
use crate::location::Location;
use crate::pass::PassIter;
use crate::sun::sun_eci_km;
use crate::time::gmst;
use chrono::{DateTime, Duration, Utc};
use std::f64::consts::PI;

/// A position and velocity in the ECEF frame at a given instant.
///
/// `osculating_elements` is computed on first access and memoized, since it
/// requires an ECEF->ECI transform plus a full `rv2coe` and is rarely needed.
#[derive(Debug, Clone)]
pub struct Position {
    pub when_utc: DateTime<Utc>,
    pub position_ecef: Ecef,
    pub velocity_ecef: Ecef,
    pub error_estimate: Option<f64>,
    osculating: std::cell::OnceCell<crate::elements::ClassicalElements>,
}

impl Position {
    pub fn new(when_utc: DateTime<Utc>, position_ecef: Ecef, velocity_ecef: Ecef) -> Self {
        Position {
            when_utc,
            position_ecef,
            velocity_ecef,
            error_estimate: None,
            osculating: std::cell::OnceCell::new(),
        }
    }

    /// Geodetic latitude/longitude/altitude of this position.
    pub fn geodetic(&self) -> crate::frames::Geodetic {
        crate::frames::ecef_to_geodetic(self.position_ecef)
    }

    /// Osculating Keplerian elements at this instant, derived by converting
    /// ECEF to ECI and running `rv2coe`. Memoized after first call.
    pub fn osculating_elements(&self) -> &crate::elements::ClassicalElements {
        self.osculating.get_or_init(|| {
            let theta = gmst(self.when_utc);
            let position_eci = ecef_to_eci(self.position_ecef, theta);
            let velocity_eci = ecef_to_eci(self.velocity_ecef, theta);
            let (p, ecc, inc, raan, argp, ta) =
                rv2coe(crate::constants::MU_E, position_eci, velocity_eci);
            let sma = p / (1.0 - ecc * ecc);
            crate::elements::ClassicalElements {
                sma_km: sma,
                ecc,
                inc_rad: inc,
                raan_rad: raan,
                argp_rad: argp,
                ta_rad: ta,
            }
        })
    }
}

/// Capability set exposed by every propagator backend.
pub trait Propagate {
    /// Position and velocity in the ECI frame at `when_utc`.
    fn propagate_eci(&self, when_utc: DateTime<Utc>) -> Result<(Eci, Eci)>;

    /// Mean motion, in radians per minute.
    fn mean_motion(&self) -> f64;

    /// Orbital period, in minutes.
    fn period_min(&self) -> f64 {
        2.0 * PI / self.mean_motion()
    }

    /// Position and velocity in the ECEF frame at `when_utc`.
    fn propagate_ecef(&self, when_utc: DateTime<Utc>) -> Result<(Ecef, Ecef)> {
        let (position_eci, velocity_eci) = self.propagate_eci(when_utc)?;
        let theta = gmst(when_utc);
        Ok((eci_to_ecef(position_eci, theta), eci_to_ecef(velocity_eci, theta)))
    }

    /// Full [`Position`] (ECEF position, velocity, lazily-derived extras) at
    /// `when_utc`.
    fn get_position(&self, when_utc: DateTime<Utc>) -> Result<Position> {
        let (position_ecef, velocity_ecef) = self.propagate_ecef(when_utc)?;
        Ok(Position::new(when_utc, position_ecef, velocity_ecef))
    }

    /// ECEF position only, the hot path used by the pass-search elevation
    /// kernel: skips building the full [`Position`] wrapper.
    fn get_only_position(&self, when_utc: DateTime<Utc>) -> Result<Ecef> {
        Ok(self.propagate_ecef(when_utc)?.0)
    }

    /// Unit vector normal to the orbital plane (`r x v / |r x v|`), in ECI.
    fn get_normal_vector(&self, when_utc: DateTime<Utc>) -> Result<[f64; 3]> {
        let (r, v) = self.propagate_eci(when_utc)?;
        let cross = [
            r.0[1] * v.0[2] - r.0[2] * v.0[1],
            r.0[2] * v.0[0] - r.0[0] * v.0[2],
            r.0[0] * v.0[1] - r.0[1] * v.0[0],
        ];
        let norm = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
        Ok([cross[0] / norm, cross[1] / norm, cross[2] / norm])
    }

    /// Angle between the orbital plane and the Sun direction, in degrees,
    /// in `[-90, 90]`.
    fn get_beta(&self, when_utc: DateTime<Utc>) -> Result<f64> {
        let normal = self.get_normal_vector(when_utc)?;
        let sun = sun_eci_km(when_utc).0;

        let dot = sun[0] * normal[0] + sun[1] * normal[1] + sun[2] * normal[2];
        let sun_norm = (sun[0] * sun[0] + sun[1] * sun[1] + sun[2] * sun[2]).sqrt();
        let beta_complement = (dot / sun_norm).clamp(-1.0, 1.0).acos();

        Ok(90.0 - beta_complement.to_degrees())
    }

    /// Eclipse duration at `when_utc`, in minutes, for near-circular orbits
    /// (`ecc <= 0.1`). Closed form derived from the beta angle.
    fn get_eclipse_duration(&self, when_utc: DateTime<Utc>) -> Result<f64> {
        let position = self.get_position(when_utc)?;
        let ecc = position.osculating_elements().ecc;
        if ecc > 0.1 {
            return Err(Error::NotImplemented("eclipse duration for non-circular orbits"));
        }

        let beta = self.get_beta(when_utc)?.to_radians();
        let r = position.osculating_elements().sma_km;
        let period = self.period_min();

        let arg = (1.0 - (R_E / r).powi(2)).sqrt() / beta.cos();
        Ok(period / PI * arg.clamp(-1.0, 1.0).acos())
    }

    /// Lazily-generated ordered stream of passes over `location`, starting at
    /// or after `start`, with TCA strictly before `limit`.
    fn passes_over<'a>(
        &'a self,
        location: &'a Location,
        start: DateTime<Utc>,
        limit: DateTime<Utc>,
        max_elevation_gt_deg: f64,
        aos_at_deg: f64,
        tolerance: Duration,
    ) -> PassIter<'a, Self>
    where
        Self: Sized,
    {
        PassIter::new(self, location, start, limit, max_elevation_gt_deg, aos_at_deg, tolerance)
    }

    /// Lazily-generated ordered stream of eclipse intervals between `start`
    /// and `limit`.
    fn eclipses_since<'a>(&'a self, start: DateTime<Utc>, limit: DateTime<Utc>) -> EclipseIter<'a, Self>
    where
        Self: Sized,
    {
        EclipseIter::new(self, start, limit)
    }
}

/// Sum type over the three supported propagation backends.
///
/// The only backend-specific operations are `propagate_eci` and
/// `mean_motion`; everything else is a default method on [`Propagate`].
pub enum Propagator {
    Sgp4(Sgp4),
    Keplerian(Keplerian),
    J2Secular(J2Secular),
}

impl Propagate for Propagator {
    fn propagate_eci(&self, when_utc: DateTime<Utc>) -> Result<(Eci, Eci)> {
        match self {
            Propagator::Sgp4(p) => p.propagate_eci(when_utc),
            Propagator::Keplerian(p) => p.propagate_eci(when_utc),
            Propagator::J2Secular(p) => p.propagate_eci(when_utc),
        }
    }

    fn mean_motion(&self) -> f64 {
        match self {
            Propagator::Sgp4(p) => p.mean_motion(),
            Propagator::Keplerian(p) => p.mean_motion(),
            Propagator::J2Secular(p) => p.mean_motion(),
        }
    }
}
