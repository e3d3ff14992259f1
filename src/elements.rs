//! Classical orbital elements and their conversion to/from a Cartesian state
//! vector (perifocal -> ECI via Euler rotations, and the inverse with
//! singular-case handling for circular and/or equatorial orbits).

use crate::frames::{transform, Axis, Eci, Vector3};
use std::f64::consts::PI;

const SINGULARITY_TOLERANCE: f64 = 1e-8;

/// Classical (Keplerian) orbital elements.
///
/// Invariants: `sma_km > 0`, `0.0 <= ecc < 1.0`, `0.0 <= inc_rad <= PI`, all
/// angles stored modulo 2*PI.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassicalElements {
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_rad: f64,
    pub raan_rad: f64,
    pub argp_rad: f64,
    pub ta_rad: f64,
}

impl ClassicalElements {
    /// Semi-latus rectum, km.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.sma_km * (1.0 - self.ecc * self.ecc)
    }
}

fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

fn dot(a: Vector3, b: Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vector3, b: Vector3) -> Vector3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Vector3) -> f64 {
    dot(a, a).sqrt()
}

fn scale(a: Vector3, s: f64) -> Vector3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn sub(a: Vector3, b: Vector3) -> Vector3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Perifocal position and velocity for a given semi-latus rectum, eccentricity
/// and true anomaly.
fn rv_pqw(mu: f64, p: f64, ecc: f64, ta: f64) -> (Vector3, Vector3) {
    let (sin_ta, cos_ta) = (ta.sin(), ta.cos());
    let r = p / (1.0 + ecc * cos_ta);
    let position = [r * cos_ta, r * sin_ta, 0.0];
    let k = (mu / p).sqrt();
    let velocity = [k * -sin_ta, k * (ecc + cos_ta), 0.0];
    (position, velocity)
}

/// Classical elements to ECI state vector.
///
/// Perifocal vectors are rotated by Z(-argp) then X(-inc) then Z(-raan).
pub fn coe2rv(mu: f64, p: f64, ecc: f64, inc: f64, raan: f64, argp: f64, ta: f64) -> (Eci, Eci) {
    let (position_pqw, velocity_pqw) = rv_pqw(mu, p, ecc, ta);

    let rotate_to_eci = |v: Vector3| -> Vector3 {
        let v = transform(v, Axis::Z, -argp);
        let v = transform(v, Axis::X, -inc);
        transform(v, Axis::Z, -raan)
    };

    (Eci(rotate_to_eci(position_pqw)), Eci(rotate_to_eci(velocity_pqw)))
}

/// ECI state vector to classical elements, with singular-case handling for
/// circular and/or equatorial orbits.
///
/// Returns `(p, ecc, inc, raan, argp, ta)`; all angles are in `[0, 2*PI)`.
pub fn rv2coe(mu: f64, r: Eci, v: Eci) -> (f64, f64, f64, f64, f64, f64) {
    let r = r.0;
    let v = v.0;

    let h = cross(r, v);
    let h_norm = norm(h);
    let n = scale(cross([0.0, 0.0, 1.0], h), 1.0 / h_norm);
    let r_norm = norm(r);

    let e = scale(
        sub(scale(r, dot(v, v) - mu / r_norm), scale(v, dot(r, v))),
        1.0 / mu,
    );
    let ecc = norm(e);
    let p = dot(h, h) / mu;
    let inc = (h[2] / h_norm).acos();

    let circular = ecc < SINGULARITY_TOLERANCE;
    let equatorial = inc.abs() < SINGULARITY_TOLERANCE;

    let (raan, argp, ta) = if equatorial && !circular {
        let raan = 0.0;
        let argp = normalize(e[1].atan2(e[0]));
        let ta = normalize((dot(h, cross(e, r)) / h_norm).atan2(dot(r, e)));
        (raan, argp, ta)
    } else if !equatorial && circular {
        let raan = normalize(n[1].atan2(n[0]));
        let argp = 0.0;
        let ta = normalize((dot(r, cross(h, n)) / h_norm).atan2(dot(r, n)));
        (raan, argp, ta)
    } else if equatorial && circular {
        let raan = 0.0;
        let argp = 0.0;
        let ta = normalize(r[1].atan2(r[0]));
        (raan, argp, ta)
    } else {
        let raan = normalize(n[1].atan2(n[0]));
        let argp = normalize((dot(e, cross(h, n)) / h_norm).atan2(dot(e, n)));
        let ta = normalize((dot(r, cross(h, e)) / h_norm).atan2(dot(r, e)));
        (raan, argp, ta)
    };

    (p, ecc, inc, raan, argp, ta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MU_E;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn rv2coe_vallado_2_5() {
        // Vallado example 2.5.
        let r = Eci([6524.384, 6862.875, 6448.296]);
        let v = Eci([4.9013, 5.5338, -1.9763]);
        let (p, ecc, inc, raan, argp, ta) = rv2coe(MU_E, r, v);

        assert_close(p, 11067.79, 1.0);
        assert_close(ecc, 0.83285, 1e-4);
        assert_close(inc.to_degrees(), 87.870, 1e-2);
        assert_close(raan.to_degrees(), 227.89, 1e-2);
        assert_close(argp.to_degrees(), 53.38, 1e-1);
        assert_close(ta.to_degrees(), 92.335, 1e-1);
    }

    #[test]
    fn coe2rv_rv2coe_roundtrip_general() {
        let p = 7000.0;
        let ecc = 0.1;
        let inc = 45.0_f64.to_radians();
        let raan = 60.0_f64.to_radians();
        let argp = 30.0_f64.to_radians();
        let ta = 10.0_f64.to_radians();

        let (r, v) = coe2rv(MU_E, p, ecc, inc, raan, argp, ta);
        let (p2, ecc2, inc2, raan2, argp2, ta2) = rv2coe(MU_E, r, v);

        assert_close(p, p2, 1e-6);
        assert_close(ecc, ecc2, 1e-9);
        assert_close(inc, inc2, 1e-9);
        assert_close(raan, raan2, 1e-9);
        assert_close(argp, argp2, 1e-9);
        assert_close(ta, ta2, 1e-9);
    }

    #[test]
    fn coe2rv_rv2coe_roundtrip_circular_equatorial() {
        let p = 7000.0;
        let ecc = 0.0;
        let inc = 0.0;
        let raan = 0.0;
        let argp = 0.0;
        let ta = 45.0_f64.to_radians();

        let (r, v) = coe2rv(MU_E, p, ecc, inc, raan, argp, ta);
        let (p2, ecc2, inc2, _raan2, _argp2, ta2) = rv2coe(MU_E, r, v);

        assert_close(p, p2, 1e-6);
        assert_close(ecc2, 0.0, 1e-9);
        assert_close(inc2, 0.0, 1e-9);
        // True longitude replaces raan+argp+ta in this singular case.
        assert_close(ta.rem_euclid(2.0 * PI), ta2, 1e-9);
    }
}
