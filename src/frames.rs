//! Coordinate frame machinery: elementary rotations, ECI<->ECEF via GMST,
//! geodetic<->ECEF (WGS84), and the topocentric horizon transform.

use crate::constants::{F_E, R_E};

pub type Vector3 = [f64; 3];

/// Position or velocity expressed in the Earth-centered inertial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eci(pub Vector3);

/// Position or velocity expressed in the Earth-centered Earth-fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecef(pub Vector3);

/// Geodetic latitude/longitude/altitude (WGS84), in radians and km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_km: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Right-handed elementary rotation of `vec` about `axis` by `angle` radians
/// (active/alibi convention: the vector rotates, the frame stays fixed).
pub fn rotate(vec: Vector3, axis: Axis, angle: f64) -> Vector3 {
    let (c, s) = (angle.cos(), angle.sin());
    match axis {
        Axis::X => [vec[0], c * vec[1] - s * vec[2], s * vec[1] + c * vec[2]],
        Axis::Y => [c * vec[0] + s * vec[2], vec[1], -s * vec[0] + c * vec[2]],
        Axis::Z => [c * vec[0] - s * vec[1], s * vec[0] + c * vec[1], vec[2]],
    }
}

/// Passive/alias rotation: rotates the *frame* by `angle`, equivalent to
/// `rotate(vec, axis, -angle)`.
pub fn transform(vec: Vector3, axis: Axis, angle: f64) -> Vector3 {
    rotate(vec, axis, -angle)
}

/// Rotates an ECI vector into ECEF given GMST, in radians.
pub fn eci_to_ecef(v: Eci, gmst: f64) -> Ecef {
    let (c, s) = (gmst.cos(), gmst.sin());
    let [x, y, z] = v.0;
    Ecef([c * x + s * y, -s * x + c * y, z])
}

/// Rotates an ECEF vector into ECI given GMST, in radians.
pub fn ecef_to_eci(v: Ecef, gmst: f64) -> Eci {
    let (c, s) = (gmst.cos(), gmst.sin());
    let [x, y, z] = v.0;
    Eci([c * x - s * y, s * x + c * y, z])
}

/// WGS84 geodetic to ECEF, closed form.
pub fn geodetic_to_ecef(geodetic: Geodetic) -> Ecef {
    let (sin_lat, cos_lat) = (geodetic.lat_rad.sin(), geodetic.lat_rad.cos());
    let (sin_lon, cos_lon) = (geodetic.lon_rad.sin(), geodetic.lon_rad.cos());
    let e2 = F_E * (2.0 - F_E);
    let n = R_E / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Ecef([
        (n + geodetic.alt_km) * cos_lat * cos_lon,
        (n + geodetic.alt_km) * cos_lat * sin_lon,
        (n * (1.0 - e2) + geodetic.alt_km) * sin_lat,
    ])
}

/// WGS84 ECEF to geodetic, via Bowring's single-step approximation.
///
/// Self-consistent with `geodetic_to_ecef` to within centimeters for
/// altitudes below 9000 km.
pub fn ecef_to_geodetic(v: Ecef) -> Geodetic {
    let [x, y, z] = v.0;
    let a = R_E;
    let b = a * (1.0 - F_E);
    let e2 = F_E * (2.0 - F_E);
    let ep2 = (a * a - b * b) / (b * b);

    let p = (x * x + y * y).sqrt();
    let theta = (z * a).atan2(p * b);
    let (sin_theta, cos_theta) = (theta.sin(), theta.cos());

    let lat = (z + ep2 * b * sin_theta.powi(3)).atan2(p - e2 * a * cos_theta.powi(3));
    let lon = y.atan2(x);

    let sin_lat = lat.sin();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let alt = p / lat.cos() - n;

    Geodetic {
        lat_rad: lat,
        lon_rad: lon,
        alt_km: alt,
    }
}

/// South/east/zenith components of `delta` (an ECEF offset from an observer
/// at `observer_lat_rad`/`observer_lon_rad`).
pub fn to_sez(observer_lat_rad: f64, observer_lon_rad: f64, delta: Vector3) -> Vector3 {
    let (sin_lat, cos_lat) = (observer_lat_rad.sin(), observer_lat_rad.cos());
    let (sin_lon, cos_lon) = (observer_lon_rad.sin(), observer_lon_rad.cos());
    let [dx, dy, dz] = delta;

    let south = sin_lat * cos_lon * dx + sin_lat * sin_lon * dy - cos_lat * dz;
    let east = -sin_lon * dx + cos_lon * dy;
    let zenith = cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz;

    [south, east, zenith]
}

/// Elevation and azimuth from south/east/zenith components, in radians.
pub fn sez_to_az_el(sez: Vector3) -> (f64, f64) {
    let [south, east, zenith] = sez;
    let range = (south * south + east * east + zenith * zenith).sqrt();
    let elevation = (zenith / range).asin();
    let azimuth = (-east).atan2(south) + std::f64::consts::PI;
    (azimuth, elevation)
}
