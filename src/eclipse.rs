//! Eclipse search (C7): windowed minimization of the illumination function to
//! find a candidate eclipse center, then bisection to its start/end zero
//! crossings.

use crate::error::Result;
use crate::frames::ecef_to_eci;
use crate::propagator::Propagate;
use crate::sun::{illumination, sun_eci_km};
use crate::time::gmst;
use chrono::{DateTime, Duration, Utc};

const MINIMIZE_TOLERANCE_S: f64 = 1e-2;
const ROOT_TOLERANCE_S: f64 = 1e-2;
const GOLDEN_RATIO: f64 = 0.6180339887498949;

/// A single eclipse window (umbra or penumbra entry to exit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eclipse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Lazily-generated ordered stream of eclipses. Construct via
/// [`crate::propagator::Propagate::eclipses_since`].
pub struct EclipseIter<'a, P: Propagate> {
    propagator: &'a P,
    start: DateTime<Utc>,
    limit: DateTime<Utc>,
    window_s: f64,
    done: bool,
}

impl<'a, P: Propagate> EclipseIter<'a, P> {
    pub(crate) fn new(propagator: &'a P, start: DateTime<Utc>, limit: DateTime<Utc>) -> Self {
        let orbital_period_s = propagator.period_min() * 60.0;
        EclipseIter {
            propagator,
            start,
            limit,
            window_s: orbital_period_s / 3.0,
            done: false,
        }
    }

    fn illumination_at_offset(&self, base: DateTime<Utc>, delta_s: f64) -> Result<f64> {
        let when_utc = base + Duration::milliseconds((delta_s * 1000.0) as i64);
        let position_ecef = self.propagator.get_only_position(when_utc)?;
        let theta = gmst(when_utc);
        let r_sat = ecef_to_eci(position_ecef, theta);
        let r_sun = sun_eci_km(when_utc);
        Ok(illumination(r_sun, r_sat))
    }
}

/// Golden-section search for the minimizer of `f` over `[lo, hi]`.
fn golden_section_min(mut lo: f64, mut hi: f64, tol: f64, mut f: impl FnMut(f64) -> f64) -> f64 {
    let mut c = hi - GOLDEN_RATIO * (hi - lo);
    let mut d = lo + GOLDEN_RATIO * (hi - lo);
    while (hi - lo).abs() > tol {
        if f(c) < f(d) {
            hi = d;
        } else {
            lo = c;
        }
        c = hi - GOLDEN_RATIO * (hi - lo);
        d = lo + GOLDEN_RATIO * (hi - lo);
    }
    (lo + hi) / 2.0
}

/// Bisection root-find of `f` over a bracket `[lo, hi]` with `f(lo)` and
/// `f(hi)` of opposite sign.
fn bisect_root(mut lo: f64, mut hi: f64, tol: f64, mut f: impl FnMut(f64) -> f64) -> f64 {
    let mut f_lo = f(lo);
    while (hi - lo).abs() > tol {
        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);
        if f_lo.signum() == f_mid.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

impl<'a, P: Propagate> Iterator for EclipseIter<'a, P> {
    type Item = Result<Eclipse>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.start >= self.limit {
                self.done = true;
                return None;
            }

            let base = self.start;
            let mut propagation_error = None;
            let center_delta_s = golden_section_min(0.0, self.window_s, MINIMIZE_TOLERANCE_S, |t| {
                match self.illumination_at_offset(base, t) {
                    Ok(value) => value,
                    Err(error) => {
                        propagation_error.get_or_insert(error);
                        f64::INFINITY
                    }
                }
            });
            if let Some(error) = propagation_error {
                self.done = true;
                return Some(Err(error));
            }

            let orbital_period_s = self.propagator.period_min() * 60.0;
            let center_illumination = match self.illumination_at_offset(base, center_delta_s) {
                Ok(value) => value,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            };

            if center_illumination < 0.0 {
                let mut propagation_error = None;
                let mut eval = |t: f64| match self.illumination_at_offset(base, t) {
                    Ok(value) => value,
                    Err(error) => {
                        propagation_error.get_or_insert(error);
                        0.0
                    }
                };

                let start_delta_s = bisect_root(
                    center_delta_s - orbital_period_s / 2.0,
                    center_delta_s,
                    ROOT_TOLERANCE_S,
                    &mut eval,
                );
                let end_delta_s = bisect_root(
                    center_delta_s,
                    center_delta_s + orbital_period_s / 2.0,
                    ROOT_TOLERANCE_S,
                    &mut eval,
                );

                if let Some(error) = propagation_error {
                    self.done = true;
                    return Some(Err(error));
                }

                let eclipse_start = base + Duration::milliseconds((start_delta_s * 1000.0) as i64);
                let eclipse_end = base + Duration::milliseconds((end_delta_s * 1000.0) as i64);
                self.start = eclipse_end + Duration::milliseconds((self.window_s * 1000.0) as i64);

                return Some(Ok(Eclipse {
                    start: eclipse_start,
                    end: eclipse_end,
                }));
            } else {
                self.start = base + Duration::milliseconds((self.window_s * 1000.0) as i64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ClassicalElements;
    use crate::propagator::{J2Secular, Propagator};
    use chrono::TimeZone;

    #[test]
    fn finds_at_least_one_eclipse_over_a_day_for_a_low_circular_orbit() {
        let elements = ClassicalElements {
            sma_km: 6878.0,
            ecc: 0.001,
            inc_rad: 51.6_f64.to_radians(),
            raan_rad: 0.0,
            argp_rad: 0.0,
            ta_rad: 0.0,
        };
        let epoch = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let propagator = Propagator::J2Secular(J2Secular::new(elements, epoch));

        let limit = epoch + Duration::days(1);
        let eclipses: Vec<_> = propagator
            .eclipses_since(epoch, limit)
            .collect::<Result<_>>()
            .unwrap();

        assert!(!eclipses.is_empty());
        for eclipse in &eclipses {
            assert!(eclipse.end > eclipse.start);
        }
    }
}
