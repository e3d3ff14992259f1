//! Crate-wide error taxonomy.
//!
//! Propagation failures and lost search phases are fatal to the current
//! operation; the remaining variants guard the derived-orbit constructors
//! and the Kepler solver.

/// Errors surfaced by propagation, pass search, eclipse search and the
/// derived-orbit constructors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A propagator backend failed, or a pass search lost the ascending or
    /// descending phase of the elevation curve.
    #[error("propagation failed: {0}")]
    Propagation(String),

    /// Pass search reached the search limit date without a qualifying pass.
    #[error("search limit date exceeded without a qualifying pass")]
    NotReachable,

    /// A TLE source could not satisfy the query.
    #[error("no TLE found for {sate_id} at or before {when}")]
    NotFound { sate_id: String, when: String },

    /// The Sun-synchronous or repeating-ground-track constraints are
    /// unsatisfiable for the given inputs.
    #[error("orbit is not physically realizable: {0}")]
    InvalidOrbit(String),

    /// The Kepler equation solver exceeded its iteration cap.
    #[error("Kepler solver did not converge after {iterations} iterations")]
    Convergence { iterations: u32 },

    /// The requested operation is not implemented for this kind of orbit.
    #[error("{0} is not implemented for this orbit")]
    NotImplemented(&'static str),
}

impl From<sgp4::Error> for Error {
    fn from(error: sgp4::Error) -> Self {
        Error::Propagation(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
