//! Satellite orbit prediction: ground-station pass search, Earth-eclipse
//! search, and the Keplerian/J2/SGP4 propagator core underneath both.
//!
//! SGP4 itself is not implemented here; it is delegated to the `sgp4` crate
//! and wrapped as one of three [`propagator::Propagator`] backends
//! alongside a pure two-body Keplerian propagator and a J2-secular one.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use orbit_predictor::location::Location;
//! use orbit_predictor::propagator::{Propagate, Propagator, Sgp4, Tle};
//!
//! # fn main() -> orbit_predictor::error::Result<()> {
//! let tle = Tle::new(
//!     Some("BUGSAT-1".to_owned()),
//!     "1 40014U 14033E   20179.25190503  .00000110  00000-0  36632-4 0  9997",
//!     "2 40014  97.9602 307.5076 0014527 81.5938 278.6709 14.91175328316903",
//! );
//! let propagator = Propagator::Sgp4(Sgp4::from_tle(tle)?);
//! let location = Location::new("Buenos Aires", -34.6037, -58.3816, 25.0);
//!
//! let start = Utc.with_ymd_and_hms(2020, 6, 28, 0, 0, 0).unwrap();
//! let limit = start + Duration::days(1);
//! for pass in propagator.passes_over(&location, start, limit, 0.0, 0.0, Duration::seconds(1)) {
//!     let pass = pass?;
//!     println!("AOS {} TCA {} LOS {}", pass.aos, pass.tca, pass.los);
//! }
//! # Ok(())
//! # }
//! ```

pub mod angles;
pub mod constants;
pub mod derived;
pub mod eclipse;
pub mod elements;
pub mod error;
pub mod frames;
pub mod location;
pub mod pass;
pub mod propagator;
pub mod sun;
pub mod time;
pub mod tle_source;

pub use error::{Error, Result};
pub use propagator::{Propagate, Propagator};
