//! TLE lookup contract (C9 supplement): the `TleSource` trait plus an
//! in-memory implementation. External catalogs (Celestrak, Spacetrack) are
//! out of scope; they'd implement the same trait.

use crate::error::Error;
use crate::propagator::Tle;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A source of TLEs for a satellite, keyed by its catalog identifier.
///
/// Implementations pick the TLE whose epoch is closest to the requested
/// instant, per the `get_tle` contract below.
pub trait TleSource {
    /// Returns the TLE for `sate_id` whose epoch is closest to `when_utc`.
    fn get_tle(&self, sate_id: &str, when_utc: DateTime<Utc>) -> Result<Tle, Error>;
}

/// An in-memory TLE store, picking the closest-epoch TLE on lookup.
#[derive(Default)]
pub struct MemoryTleSource {
    tles: HashMap<String, Vec<(DateTime<Utc>, Tle)>>,
}

impl MemoryTleSource {
    pub fn new() -> Self {
        MemoryTleSource { tles: HashMap::new() }
    }

    /// Registers `tle`, recorded under `sate_id` at `epoch`.
    pub fn add_tle(&mut self, sate_id: impl Into<String>, epoch: DateTime<Utc>, tle: Tle) {
        self.tles.entry(sate_id.into()).or_default().push((epoch, tle));
    }
}

impl TleSource for MemoryTleSource {
    fn get_tle(&self, sate_id: &str, when_utc: DateTime<Utc>) -> Result<Tle, Error> {
        let candidates = self.tles.get(sate_id).ok_or_else(|| Error::NotFound {
            sate_id: sate_id.to_owned(),
            when: when_utc.to_rfc3339(),
        })?;

        candidates
            .iter()
            .min_by_key(|(epoch, _)| (*epoch - when_utc).num_milliseconds().abs())
            .map(|(_, tle)| tle.clone())
            .ok_or_else(|| Error::NotFound {
                sate_id: sate_id.to_owned(),
                when: when_utc.to_rfc3339(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tle(line1: &str, line2: &str) -> Tle {
        Tle::new(None, line1, line2)
    }

    #[test]
    fn picks_closest_epoch() {
        let mut source = MemoryTleSource::new();
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap();
        source.add_tle("BUGSAT-1", early, tle("1 ...", "2 ..."));
        source.add_tle("BUGSAT-1", late, tle("1 +++", "2 +++"));

        let query = Utc.with_ymd_and_hms(2020, 1, 9, 0, 0, 0).unwrap();
        let found = source.get_tle("BUGSAT-1", query).unwrap();
        assert_eq!(found.line1, "1 +++");
    }

    #[test]
    fn missing_satellite_is_not_found() {
        let source = MemoryTleSource::new();
        let when = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(source.get_tle("UNKNOWN", when), Err(Error::NotFound { .. })));
    }
}
