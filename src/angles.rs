//! Anomaly conversions (true/eccentric/mean) and the Kepler equation solver.

use crate::error::Error;
use std::f64::consts::PI;

const KEPLER_RELATIVE_TOLERANCE: f64 = 1e-15;
const KEPLER_MAX_ITERATIONS: u32 = 50;

fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

/// Eccentric anomaly from true anomaly (half-angle tangent form).
pub fn ta_to_e(ta: f64, ecc: f64) -> f64 {
    let e = 2.0 * (((1.0 - ecc) / (1.0 + ecc)).sqrt() * (ta / 2.0).tan()).atan();
    normalize(e)
}

/// True anomaly from eccentric anomaly (half-angle tangent form).
pub fn e_to_ta(e: f64, ecc: f64) -> f64 {
    let ta = 2.0 * (((1.0 + ecc) / (1.0 - ecc)).sqrt() * (e / 2.0).tan()).atan();
    normalize(ta)
}

/// Mean anomaly from eccentric anomaly (Kepler's equation).
pub fn e_to_m(e: f64, ecc: f64) -> f64 {
    normalize(e - ecc * e.sin())
}

/// Eccentric anomaly from mean anomaly, by Newton iteration on Kepler's
/// equation `f(E) = E - e sin E - M`, starting from `E0 = M`.
///
/// Fails with [`Error::Convergence`] after 50 iterations, which is
/// practically unreachable for `e < 1`.
pub fn m_to_e(m: f64, ecc: f64) -> Result<f64, Error> {
    let mut e = m;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = e - ecc * e.sin() - m;
        let f_prime = 1.0 - ecc * e.cos();
        let e_next = e - f / f_prime;
        if e_next == e || ((e_next - e) / e_next).abs() < KEPLER_RELATIVE_TOLERANCE {
            return Ok(e_next);
        }
        e = e_next;
    }
    Err(Error::Convergence {
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// True anomaly from mean anomaly.
pub fn m_to_ta(m: f64, ecc: f64) -> Result<f64, Error> {
    let e = m_to_e(m, ecc)?;
    Ok(e_to_ta(e, ecc))
}

/// Mean anomaly from true anomaly.
pub fn ta_to_m(ta: f64, ecc: f64) -> f64 {
    let e = ta_to_e(ta, ecc);
    e_to_m(e, ecc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e_ta_roundtrip() {
        for ecc in [0.0, 0.1, 0.5, 0.9] {
            for ta_deg in [0.0, 30.0, 90.0, 180.0 - 1e-6, 270.0, 359.0] {
                let ta = ta_deg.to_radians();
                let e = ta_to_e(ta, ecc);
                let back = e_to_ta(e, ecc);
                let diff = (back - ta).rem_euclid(2.0 * PI);
                assert!(diff.min(2.0 * PI - diff) < 1e-6, "ecc={ecc} ta={ta_deg}");
            }
        }
    }

    #[test]
    fn m_ta_roundtrip() {
        for ecc in [0.0, 0.1, 0.5, 0.9] {
            for ta_deg in [0.0, 30.0, 90.0, 180.0 - 1e-6, 270.0, 359.0] {
                let ta = ta_deg.to_radians();
                let m = ta_to_m(ta, ecc);
                let back = m_to_ta(m, ecc).unwrap();
                let diff = (back - ta).rem_euclid(2.0 * PI);
                assert!(diff.min(2.0 * PI - diff) < 1e-6, "ecc={ecc} ta={ta_deg}");
            }
        }
    }

    #[test]
    fn kepler_matches_vallado_example() {
        // Vallado example 2.1: M = 235.4 deg, e = 0.4 -> E = 220.512 deg
        let m = 235.4_f64.to_radians();
        let e = m_to_e(m, 0.4).unwrap();
        assert!((e.to_degrees() - 220.512).abs() < 1e-3);
    }
}
