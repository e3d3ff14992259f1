//! Ground locations (C9): a geodetic point with a cached direction-cosine
//! triple for the elevation kernel the pass search calls on every sample.

use crate::constants::LIGHT_SPEED;
use crate::frames::{geodetic_to_ecef, to_sez, Ecef, Geodetic};
use crate::propagator::Position;
use crate::sun::sun_azimuth_elevation;
use chrono::{DateTime, Utc};

/// A fixed ground point: a name, geodetic coordinates, and the ECEF vector
/// and direction cosines derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    position_ecef: Ecef,
    direction_cosines: (f64, f64, f64),
}

impl Location {
    /// Builds a location, precomputing its ECEF position and the direction
    /// cosines `elevation_for` needs on its hot path.
    pub fn new(name: impl Into<String>, latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        let lat_rad = latitude_deg.to_radians();
        let lon_rad = longitude_deg.to_radians();
        let position_ecef = geodetic_to_ecef(Geodetic {
            lat_rad,
            lon_rad,
            alt_km: elevation_m / 1000.0,
        });

        let (sin_lat, sin_lon) = (lat_rad.sin(), lon_rad.sin());
        let (cos_lat, cos_lon) = (lat_rad.cos(), lon_rad.cos());

        Location {
            name: name.into(),
            latitude_deg,
            longitude_deg,
            elevation_m,
            position_ecef,
            direction_cosines: (cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef(&self) -> Ecef {
        self.position_ecef
    }

    /// Elevation to `position_ecef`, in radians. This is the pass-search hot
    /// path: it avoids building a full SEZ transform, using the cached
    /// direction cosines directly.
    pub fn elevation_for(&self, position_ecef: Ecef) -> f64 {
        let rx = position_ecef.0[0] - self.position_ecef.0[0];
        let ry = position_ecef.0[1] - self.position_ecef.0[1];
        let rz = position_ecef.0[2] - self.position_ecef.0[2];

        let (a, b, c) = self.direction_cosines;
        let top_z = a * rx + b * ry + c * rz;
        let range = (rx * rx + ry * ry + rz * rz).sqrt();

        (top_z / range).asin()
    }

    /// Azimuth and elevation of `position_ecef`, in radians.
    pub fn get_azimuth_elev(&self, position_ecef: Ecef) -> (f64, f64) {
        let delta = [
            position_ecef.0[0] - self.position_ecef.0[0],
            position_ecef.0[1] - self.position_ecef.0[1],
            position_ecef.0[2] - self.position_ecef.0[2],
        ];
        let sez = to_sez(self.latitude_rad(), self.longitude_rad(), delta);
        crate::frames::sez_to_az_el(sez)
    }

    /// Whether `position_ecef` is above `elevation_deg` as seen from here.
    pub fn is_visible(&self, position_ecef: Ecef, elevation_deg: f64) -> bool {
        self.elevation_for(position_ecef).to_degrees() >= elevation_deg
    }

    /// Straight-line distance to `position_ecef`, in km.
    pub fn slant_range_km(&self, position_ecef: Ecef) -> f64 {
        let [px, py, pz] = position_ecef.0;
        let [lx, ly, lz] = self.position_ecef.0;
        ((px - lx).powi(2) + (py - ly).powi(2) + (pz - lz).powi(2)).sqrt()
    }

    /// Rate of change of slant range, in km/s, approximated by stepping one
    /// second along the satellite's ECEF velocity.
    pub fn slant_range_velocity_kms(&self, position: &Position) -> f64 {
        let pos = position.position_ecef.0;
        let vel = position.velocity_ecef.0;

        let current = self.slant_range_km(position.position_ecef);
        let next = Ecef([pos[0] + vel[0], pos[1] + vel[1], pos[2] + vel[2]]);
        self.slant_range_km(next) - current
    }

    /// Doppler shift factor (relative to 1) for a signal received from
    /// `position`.
    pub fn doppler_factor(&self, position: &Position) -> f64 {
        1.0 + self.slant_range_velocity_kms(position) / LIGHT_SPEED
    }

    /// Elevation of the Sun above this location's horizon, in degrees.
    pub fn sun_elevation_on_earth(&self, when_utc: DateTime<Utc>) -> f64 {
        sun_azimuth_elevation(self.latitude_deg, self.longitude_deg, when_utc).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sun_elevation_on_earth_is_bounded() {
        let location = Location::new("TEST", 0.0, 0.0, 0.0);
        let when = Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
        let elevation = location.sun_elevation_on_earth(when);
        assert!((-90.0..=90.0).contains(&elevation));
    }

    #[test]
    fn elevation_is_ninety_degrees_directly_overhead() {
        let location = Location::new("TEST", 10.0, 20.0, 0.0);
        let overhead = Ecef(geodetic_to_ecef(Geodetic {
            lat_rad: 10.0_f64.to_radians(),
            lon_rad: 20.0_f64.to_radians(),
            alt_km: 500.0,
        })
        .0);
        let elevation = location.elevation_for(overhead).to_degrees();
        assert!((elevation - 90.0).abs() < 1e-6);
    }

    #[test]
    fn bugsat1_observer_matches_elevation_for_and_get_azimuth_elev() {
        let location = Location::new("BUGSAT-1 observer", -31.2884, -64.2033, 493.0);
        let target = Ecef(geodetic_to_ecef(Geodetic {
            lat_rad: -31.0_f64.to_radians(),
            lon_rad: -64.0_f64.to_radians(),
            alt_km: 700.0,
        })
        .0);

        let elevation_direct = location.elevation_for(target).to_degrees();
        let (_az, elevation_sez) = location.get_azimuth_elev(target);
        assert!((elevation_direct - elevation_sez.to_degrees()).abs() < 1e-6);
    }
}
