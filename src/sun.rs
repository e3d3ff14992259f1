//! Low-precision Sun vector and Earth-shadow classification.
//!
//! The Sun model trades accuracy (target: error < 1 degree, typically
//! < 0.5 degree) for a closed form with no table lookups, which is all the
//! eclipse and beta-angle calculations need.

use crate::constants::{ALPHA_PENUMBRA, ALPHA_UMBRA, AU, R_E};
use crate::frames::{Eci, Vector3};
use crate::time::jday;
use chrono::{DateTime, Timelike, Utc};

const DECEMBER_31TH_1999_MIDNIGHT_JD: f64 = 2451543.5;

fn dot(a: Vector3, b: Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: Vector3) -> f64 {
    dot(a, a).sqrt()
}

fn angle_between(a: Vector3, b: Vector3) -> f64 {
    (dot(a, b) / (norm(a) * norm(b))).clamp(-1.0, 1.0).acos()
}

/// Low-precision Sun position in the ECI frame, in astronomical units.
///
/// Follows the standard mean-element model: mean longitude of perihelion,
/// eccentricity, mean anomaly and obliquity linear in days since
/// 1999-12-31T00:00Z, refined by a one-term Kepler-like correction.
pub fn sun_eci_au(when_utc: DateTime<Utc>) -> Eci {
    let date = jday(when_utc).whole() - DECEMBER_31TH_1999_MIDNIGHT_JD;

    let w = (282.9404 + 4.70935e-5 * date).to_radians();
    let eccentricity = 0.016709 - 1.151e-9 * date;
    let m = (356.0470 + 0.9856002585 * date).to_radians().rem_euclid(2.0 * std::f64::consts::PI);
    let oblecl = (23.4393 - 3.563e-7 * date).to_radians();

    // Auxiliary (eccentric-anomaly-like) angle, one Kepler-equation correction.
    let aux = m + eccentricity * m.sin() * (1.0 + eccentricity * m.cos());

    let x = aux.cos() - eccentricity;
    let y = aux.sin() * (1.0 - eccentricity * eccentricity).sqrt();

    let r = (x * x + y * y).sqrt();
    let v = y.atan2(x);
    let sun_lon = v + w;

    let x_eclip = r * sun_lon.cos();
    let y_eclip = r * sun_lon.sin();

    // Rotate ecliptic rectangular coordinates about X by the obliquity.
    let x_equat = x_eclip;
    let y_equat = y_eclip * oblecl.cos();
    let z_equat = y_eclip * oblecl.sin();

    Eci([x_equat, y_equat, z_equat])
}

/// Low-precision Sun position in the ECI frame, in km.
pub fn sun_eci_km(when_utc: DateTime<Utc>) -> Eci {
    let [x, y, z] = sun_eci_au(when_utc).0;
    Eci([x * AU, y * AU, z * AU])
}

/// Right ascension, declination (rad) and range of an ECI vector.
pub fn eci_to_radec(v: Eci) -> (f64, f64, f64) {
    let [x, y, z] = v.0;
    let r = norm(v.0);
    (y.atan2(x), (z / r).asin(), r)
}

/// Azimuth and elevation of the Sun, in degrees, as seen from a ground point.
///
/// Follows the RA/Dec -> Alt/Az conversion via local sidereal time (the
/// Sun's own mean longitude standing in for the equation of the equinoxes),
/// distinct from the IAU-82 `gmst` used for satellite ECEF transforms.
pub fn sun_azimuth_elevation(latitude_deg: f64, longitude_deg: f64, when_utc: DateTime<Utc>) -> (f64, f64) {
    let date = jday(when_utc).whole() - DECEMBER_31TH_1999_MIDNIGHT_JD;
    let w_deg = 282.9404 + 4.70935e-5 * date;
    let m_deg = (356.0470 + 0.9856002585 * date).rem_euclid(360.0);
    let sun_mean_lon_deg = w_deg + m_deg;

    let (ra_rad, dec_rad, _range) = eci_to_radec(sun_eci_au(when_utc));
    let ra_deg = ra_rad.to_degrees();
    let dec_deg = dec_rad.to_degrees();

    let uth = when_utc.hour() as f64
        + when_utc.minute() as f64 / 60.0
        + (when_utc.second() as f64 + when_utc.timestamp_subsec_micros() as f64 / 1.0e6) / 3600.0;
    let gmst0 = (sun_mean_lon_deg + 180.0).rem_euclid(360.0) / 15.0;
    let sidereal = gmst0 + uth + longitude_deg / 15.0;

    let ha_rad = (sidereal * 15.0 - ra_deg).to_radians();
    let dec_rad = dec_deg.to_radians();

    let x = ha_rad.cos() * dec_rad.cos();
    let y = ha_rad.sin() * dec_rad.cos();
    let z = dec_rad.sin();

    let colat_rad = (90.0 - latitude_deg).to_radians();
    let x_hor = x * colat_rad.cos() - z * colat_rad.sin();
    let y_hor = y;
    let z_hor = x * colat_rad.sin() + z * colat_rad.cos();

    let azimuth = (y_hor.atan2(x_hor).to_degrees() + 180.0).rem_euclid(360.0);
    let elevation = z_hor.clamp(-1.0, 1.0).asin().to_degrees();

    (azimuth, elevation)
}

/// Three-valued Earth shadow classification: lit, penumbra or umbra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shadow {
    Umbra,
    Penumbra,
    Lit,
}

/// Cylindrical-cone shadow classification (Vallado §5.3, algorithm 34).
///
/// `r_sun` and `r_sat` are both ECI vectors in km.
pub fn shadow(r_sun: Eci, r_sat: Eci) -> Shadow {
    if dot(r_sun.0, r_sat.0) >= 0.0 {
        return Shadow::Lit;
    }

    let theta = angle_between([-r_sun.0[0], -r_sun.0[1], -r_sun.0[2]], r_sat.0);
    let r_sat_norm = norm(r_sat.0);
    let sat_horiz = r_sat_norm * theta.cos();
    let sat_vert = r_sat_norm * theta.sin();

    let pen_vert = ALPHA_PENUMBRA.tan() * (R_E / ALPHA_PENUMBRA.sin() + sat_horiz);
    if sat_vert > pen_vert {
        return Shadow::Lit;
    }

    let umb_vert = ALPHA_UMBRA.tan() * (R_E / ALPHA_UMBRA.sin() - sat_horiz);
    if sat_vert <= umb_vert {
        Shadow::Umbra
    } else {
        Shadow::Penumbra
    }
}

/// Continuous signed illumination function used by the eclipse search.
///
/// Strictly positive in sunlight, strictly negative in penumbra or umbra;
/// its zero crossings are exactly the shadow-boundary events.
pub fn illumination(r_sun: Eci, r_sat: Eci) -> f64 {
    if dot(r_sun.0, r_sat.0) < 0.0 {
        let theta = angle_between([-r_sun.0[0], -r_sun.0[1], -r_sun.0[2]], r_sat.0);
        let r_sat_norm = norm(r_sat.0);
        let sat_horiz = r_sat_norm * theta.cos();
        let sat_vert = r_sat_norm * theta.sin();
        let pen_vert = ALPHA_PENUMBRA.tan() * (R_E / ALPHA_PENUMBRA.sin() + sat_horiz);
        sat_vert - pen_vert
    } else {
        norm(r_sat.0) - R_E / ALPHA_PENUMBRA.cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sun_azimuth_elevation_is_bounded() {
        let when = Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
        let (azimuth, elevation) = sun_azimuth_elevation(0.0, 0.0, when);
        assert!((0.0..360.0).contains(&azimuth));
        assert!((-90.0..=90.0).contains(&elevation));
    }

    #[test]
    fn shadow_classifies_lit_point() {
        let when = Utc.with_ymd_and_hms(2000, 1, 1, 12, 9, 0).unwrap();
        let r_sun = sun_eci_km(when);
        let r_sat = Eci([1272.93, 6984.99, 1299.82]);
        assert_eq!(shadow(r_sun, r_sat), Shadow::Lit);
    }

    #[test]
    fn shadow_classifies_umbra_point() {
        let when = Utc.with_ymd_and_hms(2000, 1, 1, 12, 30, 0).unwrap();
        let r_sun = sun_eci_km(when);
        let r_sat = Eci([-7298.55, 500.32, 639.44]);
        assert_eq!(shadow(r_sun, r_sat), Shadow::Umbra);
    }

    #[test]
    fn illumination_sign_matches_shadow_classification() {
        let when = Utc.with_ymd_and_hms(2000, 1, 1, 12, 9, 0).unwrap();
        let r_sun = sun_eci_km(when);
        let r_sat = Eci([1272.93, 6984.99, 1299.82]);
        assert!(illumination(r_sun, r_sat) > 0.0);

        let when = Utc.with_ymd_and_hms(2000, 1, 1, 12, 30, 0).unwrap();
        let r_sun = sun_eci_km(when);
        let r_sat = Eci([-7298.55, 500.32, 639.44]);
        assert!(illumination(r_sun, r_sat) < 0.0);
    }
}
