//! Ground-station pass search (C6): finds AOS/TCA/LOS windows by tracking
//! ascending/descending phases of observer elevation and bisecting to the
//! required tolerance.
//!
//! This is the bracketed algorithm; it is the default because it needs no
//! external root-finder and degrades gracefully for highly eccentric or
//! near-polar orbits, at the cost of being unable to prove it never misses a
//! pass shorter than one sampling step (see `PassIter::next`).

use crate::error::{Error, Result};
use crate::location::Location;
use crate::propagator::{Position, Propagate};
use chrono::{DateTime, Duration, Utc};
use std::f64::consts::PI;

/// A single ground-station pass: acquisition of signal, time of closest
/// approach, and loss of signal.
#[derive(Debug, Clone)]
pub struct Pass {
    pub aos: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub max_elevation_position: Position,
    pub duration: Duration,
}

struct AccuratePass {
    aos: Option<DateTime<Utc>>,
    tca: DateTime<Utc>,
    los: Option<DateTime<Utc>>,
    max_elevation_rad: f64,
}

impl AccuratePass {
    fn valid(&self) -> bool {
        self.aos.is_some() && self.los.is_some()
    }
}

/// Lazily-generated ordered stream of passes. Construct via
/// [`crate::propagator::Propagate::passes_over`].
pub struct PassIter<'a, P: Propagate> {
    propagator: &'a P,
    location: &'a Location,
    current_date: DateTime<Utc>,
    limit_date: DateTime<Utc>,
    max_elevation_gt_rad: f64,
    aos_at_rad: f64,
    tolerance: Duration,
    done: bool,
}

impl<'a, P: Propagate> PassIter<'a, P> {
    pub(crate) fn new(
        propagator: &'a P,
        location: &'a Location,
        start: DateTime<Utc>,
        limit: DateTime<Utc>,
        max_elevation_gt_deg: f64,
        aos_at_deg: f64,
        tolerance: Duration,
    ) -> Self {
        PassIter {
            propagator,
            location,
            current_date: start,
            limit_date: limit,
            max_elevation_gt_rad: max_elevation_gt_deg.max(aos_at_deg).to_radians(),
            aos_at_rad: aos_at_deg.to_radians(),
            tolerance,
            done: false,
        }
    }

    fn elevation_at(&self, when_utc: DateTime<Utc>) -> Result<f64> {
        let position = self.propagator.get_only_position(when_utc)?;
        Ok(self.location.elevation_for(position))
    }

    fn is_ascending(&self, when_utc: DateTime<Utc>) -> Result<bool> {
        let elevation = self.elevation_at(when_utc)?;
        let next_elevation = self.elevation_at(when_utc + self.tolerance)?;
        Ok(elevation <= next_elevation)
    }

    /// A timedelta corresponding to `size` orbits of the satellite.
    fn orbit_step(&self, size: f64) -> Duration {
        let step_rad = size * 2.0 * PI;
        let seconds = step_rad / self.propagator.mean_motion() * 60.0;
        Duration::milliseconds((seconds * 1000.0) as i64)
    }

    fn sample_points(&self, date: DateTime<Utc>) -> [DateTime<Utc>; 4] {
        let start = date;
        let end = date + self.orbit_step(0.99);
        let mid = midpoint(start, end);
        let mid_right = midpoint(mid, end);
        let mid_left = midpoint(start, mid);
        [end, mid, mid_right, mid_left]
    }

    fn find_nearest_descending(&self, ascending_date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        for candidate in self.sample_points(ascending_date) {
            if !self.is_ascending(candidate)? {
                return Ok(candidate);
            }
        }
        tracing::error!(location = %self.location.name, start = %ascending_date, "could not find a descending phase");
        Err(Error::Propagation("no descending phase found".to_owned()))
    }

    fn find_nearest_ascending(&self, descending_date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        for candidate in self.sample_points(descending_date) {
            if self.is_ascending(candidate)? {
                return Ok(candidate);
            }
        }
        tracing::error!(location = %self.location.name, start = %descending_date, "could not find an ascending phase");
        Err(Error::Propagation("no ascending phase found".to_owned()))
    }

    fn precision_reached(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        end - start <= self.tolerance
    }

    fn find_tca(&self, mut ascending_date: DateTime<Utc>, mut descending_date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        while !self.precision_reached(ascending_date, descending_date) {
            let mid = midpoint(ascending_date, descending_date);
            if self.is_ascending(mid)? {
                ascending_date = mid;
            } else {
                descending_date = mid;
            }
        }
        Ok(ascending_date)
    }

    fn find_aos(&self, tca: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let mut end = tca;
        let mut start = tca - self.orbit_step(0.34);
        debug_assert!(
            self.elevation_at(start)? < self.aos_at_rad,
            "find_aos bracket is not below the AOS threshold at its start"
        );
        while !self.precision_reached(start, end) {
            let mid = midpoint(start, end);
            let elevation = self.elevation_at(mid)?;
            if elevation < self.aos_at_rad {
                start = mid;
            } else {
                end = mid;
            }
        }
        Ok(end)
    }

    fn find_los(&self, tca: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let mut start = tca;
        let mut end = tca + self.orbit_step(0.34);
        while !self.precision_reached(start, end) {
            let mid = midpoint(start, end);
            let elevation = self.elevation_at(mid)?;
            if elevation < self.aos_at_rad {
                end = mid;
            } else {
                start = mid;
            }
        }
        Ok(start)
    }

    fn refine_pass(&self, ascending_date: DateTime<Utc>, descending_date: DateTime<Utc>) -> Result<AccuratePass> {
        let tca = self.find_tca(ascending_date, descending_date)?;
        let elevation = self.elevation_at(tca)?;

        let (aos, los) = if elevation > self.max_elevation_gt_rad {
            (Some(self.find_aos(tca)?), Some(self.find_los(tca)?))
        } else {
            (None, None)
        };

        Ok(AccuratePass {
            aos,
            tca,
            los,
            max_elevation_rad: elevation,
        })
    }

    fn build_pass(&self, accurate: AccuratePass) -> Result<Pass> {
        let aos = accurate.aos.expect("valid() checked before build_pass");
        let los = accurate.los.expect("valid() checked before build_pass");
        let tca_position = self.propagator.get_position(accurate.tca)?;

        Ok(Pass {
            aos,
            tca: accurate.tca,
            los,
            max_elevation_deg: accurate.max_elevation_rad.to_degrees(),
            max_elevation_position: tca_position,
            duration: los - aos,
        })
    }
}

fn midpoint(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    start + (end - start) / 2
}

impl<'a, P: Propagate> Iterator for PassIter<'a, P> {
    type Item = Result<Pass>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let ascending = match self.is_ascending(self.current_date) {
                Ok(value) => value,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            };

            if ascending {
                let ascending_date = self.current_date;
                let descending_date = match self.find_nearest_descending(ascending_date) {
                    Ok(date) => date,
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                };

                let accurate = match self.refine_pass(ascending_date, descending_date) {
                    Ok(pass) => pass,
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                };

                let tca = accurate.tca;
                let valid = accurate.valid();

                if valid && accurate.aos.unwrap() > self.limit_date {
                    self.done = true;
                    return None;
                }

                if self.current_date > self.limit_date {
                    self.done = true;
                    return None;
                }

                self.current_date = tca + self.orbit_step(0.6);

                if valid {
                    return Some(self.build_pass(accurate));
                }
                // Not a qualifying pass (below max_elevation_gt): loop for the next one.
            } else {
                self.current_date = match self.find_nearest_ascending(self.current_date) {
                    Ok(date) => date,
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                };
            }

            if self.current_date > self.limit_date {
                self.done = true;
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagator::{Propagator, Sgp4, Tle};
    use chrono::TimeZone;

    fn bugsat1() -> Propagator {
        let tle = Tle::new(
            Some("BUGSAT-1".to_owned()),
            "1 40014U 14033E   20179.25190503  .00000110  00000-0  36632-4 0  9997",
            "2 40014  97.9602 307.5076 0014527 81.5938 278.6709 14.91175328316903",
        );
        Propagator::Sgp4(Sgp4::from_tle(tle).unwrap())
    }

    #[test]
    fn finds_at_least_one_pass_over_a_week() {
        let propagator = bugsat1();
        let location = Location::new("ASGK28", -34.0, -58.0, 25.0);
        let start = Utc.with_ymd_and_hms(2020, 6, 28, 0, 0, 0).unwrap();
        let limit = start + Duration::days(7);

        let passes: Vec<_> = propagator
            .passes_over(&location, start, limit, 0.0, 0.0, Duration::seconds(1))
            .collect::<Result<_>>()
            .unwrap();

        assert!(!passes.is_empty());
        for pass in &passes {
            assert!(pass.los > pass.aos);
            assert!(pass.tca >= pass.aos && pass.tca <= pass.los);
            assert!(pass.max_elevation_deg >= 0.0 && pass.max_elevation_deg <= 90.0);
        }
    }
}
