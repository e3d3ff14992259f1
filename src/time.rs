//! UTC <-> Julian date conversions and Greenwich Mean Sidereal Time.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::VecDeque;

/// A Julian date split into an integer-ish half and a fraction, preserving
/// the precision SGP4-grade propagation needs near the day boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    pub jd: f64,
    pub fr: f64,
}

impl JulianDate {
    pub fn whole(&self) -> f64 {
        self.jd + self.fr
    }
}

/// Fliegel-Van Flandern Julian day number for a calendar date (no time of day).
fn jday_day(year: i32, month: u32, day: u32) -> f64 {
    (367 * year - (7 * (year + (month as i32 + 9) / 12)) / 4
        + (275 * month as i32) / 9
        + day as i32
        + 1721013) as f64
}

/// Bounded-capacity cache over `jday_day`, keyed by `(y, m, d)`.
///
/// A micro-optimization over recomputing the same calendar-day constant
/// across many sub-second evaluations in a single search window; not
/// thread-shared (one cache per propagator/thread).
pub struct JdayDayCache {
    capacity: usize,
    entries: VecDeque<((i32, u32, u32), f64)>,
}

impl JdayDayCache {
    pub fn new(capacity: usize) -> Self {
        JdayDayCache {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, year: i32, month: u32, day: u32) -> f64 {
        let key = (year, month, day);
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            let (_, value) = self.entries.remove(pos).unwrap();
            self.entries.push_back((key, value));
            return value;
        }
        let value = jday_day(year, month, day);
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, value));
        value
    }
}

impl Default for JdayDayCache {
    /// Capacity of roughly one year of daily entries.
    fn default() -> Self {
        JdayDayCache::new(370)
    }
}

/// Converts a UTC instant to a Julian date pair `(jd, fr)`.
pub fn jday(when_utc: DateTime<Utc>) -> JulianDate {
    let jd = jday_day(when_utc.year(), when_utc.month(), when_utc.day()) + 0.5;
    let seconds = when_utc.hour() as f64 * 3600.0
        + when_utc.minute() as f64 * 60.0
        + when_utc.second() as f64
        + when_utc.timestamp_subsec_micros() as f64 / 1.0e6;
    JulianDate {
        jd,
        fr: seconds / 86400.0,
    }
}

/// Greenwich Mean Sidereal Time, in radians, from a UTC instant.
///
/// Standard IAU-82 polynomial in Julian centuries since J2000.0, as used by
/// the reference SGP4 implementation.
pub fn gmst(when_utc: DateTime<Utc>) -> f64 {
    let jd = jday(when_utc);
    let t_ut1 = (jd.whole() - 2451545.0) / 36525.0;

    let seconds = 67310.54841
        + (876600.0 * 3600.0 + 8640184.812866) * t_ut1
        + 0.093104 * t_ut1 * t_ut1
        - 6.2e-6 * t_ut1 * t_ut1 * t_ut1;

    let mut theta = (seconds % 86400.0) / 240.0 * std::f64::consts::PI / 180.0;
    if theta < 0.0 {
        theta += 2.0 * std::f64::consts::PI;
    }
    theta % (2.0 * std::f64::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn jday_matches_known_epoch() {
        // J2000.0: 2000-01-01 12:00:00 UTC -> JD 2451545.0
        let when = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let jd = jday(when);
        assert!((jd.whole() - 2451545.0).abs() < 1e-6);
    }

    #[test]
    fn jday_day_cache_is_consistent() {
        let mut cache = JdayDayCache::default();
        let direct = jday_day(2020, 9, 25);
        assert_eq!(cache.get(2020, 9, 25), direct);
        assert_eq!(cache.get(2020, 9, 25), direct);
    }

    #[test]
    fn gmst_is_bounded() {
        let when = Utc.with_ymd_and_hms(2020, 9, 25, 9, 2, 6).unwrap();
        let theta = gmst(when);
        assert!((0.0..2.0 * std::f64::consts::PI).contains(&theta));
    }
}
