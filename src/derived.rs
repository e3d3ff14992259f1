//! Derived-orbit constructors (C8): Sun-synchronous inclination/eccentricity
//! solvers, repeating-ground-track semimajor axis, RAAN-from-LTAN, and the
//! uniformly-spaced-plane constellation and Sun-synchronous self-check this
//! repo supplements beyond the minimal form.

use crate::constants::{J2, MU_E, OMEGA_E, OMEGA_SUN, R_E};
use crate::elements::ClassicalElements;
use crate::error::{Error, Result};
use crate::sun::eci_to_radec;
use crate::sun::sun_eci_au;
use chrono::{DateTime, Utc};

/// Mean motion, radians per minute, for a circular-orbit-equivalent
/// semimajor axis `sma_km`.
pub fn mean_motion(sma_km: f64) -> f64 {
    (MU_E / sma_km.powi(3)).sqrt() * 60.0
}

/// RAAN, in degrees in `[0, 360)`, giving the requested local time of the
/// ascending node (`ltan_h`, hours) at `when_utc`.
pub fn raan_from_ltan(when_utc: DateTime<Utc>, ltan_h: f64) -> f64 {
    let sun = sun_eci_au(when_utc);
    let (ra_rad, _dec, _range) = eci_to_radec(sun);
    let ra_deg = ra_rad.to_degrees();
    (ra_deg + 15.0 * (ltan_h - 12.0)).rem_euclid(360.0)
}

/// Local time of the ascending node, in hours in `[0, 24)`, for an orbit
/// whose ascending node is at `raan_deg` at `when_utc`. Inverse of
/// [`raan_from_ltan`].
pub fn ltan_from_raan(when_utc: DateTime<Utc>, raan_deg: f64) -> f64 {
    let sun = sun_eci_au(when_utc);
    let (ra_rad, _dec, _range) = eci_to_radec(sun);
    let ra_deg = ra_rad.to_degrees();
    ((raan_deg - ra_deg) / 15.0 + 12.0).rem_euclid(24.0)
}

/// Solves for the Sun-synchronous inclination given altitude and
/// eccentricity (Vallado 4th ed. §11.4.1).
pub fn sun_synchronous_inclination_deg(alt_km: f64, ecc: f64) -> Result<f64> {
    let sma = R_E + alt_km;
    let arg = (-2.0 * sma.powf(3.5) * OMEGA_SUN * (1.0 - ecc * ecc).powi(2))
        / (3.0 * R_E * R_E * J2 * MU_E.sqrt());
    if !(-1.0..=1.0).contains(&arg) {
        return Err(Error::InvalidOrbit(
            "no Sun-synchronous inclination exists for this altitude/eccentricity".to_owned(),
        ));
    }
    Ok(arg.acos().to_degrees())
}

/// Solves for the Sun-synchronous eccentricity given altitude and
/// inclination.
pub fn sun_synchronous_eccentricity(alt_km: f64, inc_deg: f64) -> Result<f64> {
    let sma = R_E + alt_km;
    let inner = (-3.0 * R_E * R_E * J2 * MU_E.sqrt() * inc_deg.to_radians().cos())
        / (2.0 * sma.powf(3.5) * OMEGA_SUN);
    if inner < 0.0 {
        return Err(Error::InvalidOrbit(
            "no Sun-synchronous eccentricity exists for this altitude/inclination".to_owned(),
        ));
    }
    Ok((1.0 - inner.sqrt()).sqrt())
}

/// Builds the classical elements of a Sun-synchronous orbit at `when_utc`,
/// given exactly two of `(alt_km, ecc, inc_deg)`.
///
/// `ta_deg` offsets the true anomaly, used by
/// [`sun_sync_plane_constellation`] to phase satellites around one plane.
pub fn sun_synchronous(
    alt_km: Option<f64>,
    ecc: Option<f64>,
    inc_deg: Option<f64>,
    ltan_h: f64,
    when_utc: DateTime<Utc>,
    ta_deg: f64,
) -> Result<ClassicalElements> {
    let (sma, ecc, inc_deg) = match (alt_km, ecc, inc_deg) {
        (Some(alt_km), Some(ecc), None) => {
            (R_E + alt_km, ecc, sun_synchronous_inclination_deg(alt_km, ecc)?)
        }
        (Some(alt_km), None, Some(inc_deg)) => {
            (R_E + alt_km, sun_synchronous_eccentricity(alt_km, inc_deg)?, inc_deg)
        }
        _ => {
            return Err(Error::InvalidOrbit(
                "sun_synchronous requires exactly two of (alt_km, ecc, inc_deg)".to_owned(),
            ))
        }
    };

    let raan_deg = raan_from_ltan(when_utc, ltan_h);

    Ok(ClassicalElements {
        sma_km: sma,
        ecc,
        inc_rad: inc_deg.to_radians(),
        raan_rad: raan_deg.to_radians(),
        argp_rad: 0.0,
        ta_rad: ta_deg.to_radians(),
    })
}

/// Yields `num_satellites` Sun-synchronous element sets in the same plane,
/// uniformly spaced in true anomaly.
pub fn sun_sync_plane_constellation(
    num_satellites: u32,
    alt_km: Option<f64>,
    ecc: Option<f64>,
    inc_deg: Option<f64>,
    ltan_h: f64,
    when_utc: DateTime<Utc>,
) -> Result<Vec<ClassicalElements>> {
    (0..num_satellites)
        .map(|i| {
            let ta_deg = 360.0 * i as f64 / num_satellites as f64;
            sun_synchronous(alt_km, ecc, inc_deg, ltan_h, when_utc, ta_deg)
        })
        .collect()
}

/// Whether `elements` is Sun-synchronous to within `rel_tol` on the J2
/// nodal-regression rate.
pub fn is_sun_synchronous(elements: &ClassicalElements, rel_tol: f64) -> bool {
    let p = elements.semi_latus_rectum();
    let n = mean_motion(elements.sma_km);
    let raan_dot_per_min = -3.0 * n * R_E * R_E * J2 / (2.0 * p * p) * elements.inc_rad.cos();
    let raan_dot_per_sec = raan_dot_per_min / 60.0;

    let max_abs = raan_dot_per_sec.abs().max(OMEGA_SUN.abs());
    (raan_dot_per_sec - OMEGA_SUN).abs() <= rel_tol * max_abs
}

/// Semimajor axis giving a ground track that repeats every `days` days over
/// `orbits` revolutions, by fixed-point iteration on the J2-perturbed mean
/// motion (Vallado 4th ed.; Wertz "SMAD").
pub fn repeating_ground_track_sma(orbits: u32, days: u32, ecc: f64, inc_deg: f64) -> f64 {
    let k = orbits as f64 / days as f64;
    let mut n = k * OMEGA_E;

    loop {
        let sma_new = (MU_E * (1.0 / n).powi(2)).cbrt();
        let p = sma_new * (1.0 - ecc * ecc);
        let node_dot = -3.0 * n * J2 / 2.0 * (R_E / p).powi(2) * inc_deg.to_radians().cos();
        let argp_dot =
            3.0 * n * J2 / 4.0 * (R_E / p).powi(2) * (4.0 - 5.0 * inc_deg.to_radians().sin().powi(2));
        let m0_dot = 3.0 * n * J2 / 4.0 * (R_E / p).powi(2)
            * (1.0 - ecc * ecc).sqrt()
            * (2.0 - 3.0 * inc_deg.to_radians().sin().powi(2));

        n = k * (OMEGA_E - node_dot) - (m0_dot + argp_dot);
        let sma = (MU_E * (1.0 / n).powi(2)).cbrt();

        if (sma - sma_new).abs() < 1e-8 * sma_new.abs() {
            return sma;
        }
    }
}
