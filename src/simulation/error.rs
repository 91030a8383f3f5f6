//! Error taxonomy for the simulation core
//!
//! All variants are local validation failures reported at the call that
//! triggers them. Numerical edge cases (zero speed, zero separation) are not
//! errors; the force model returns a zero vector for those instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A physical parameter is out of its allowed range (mass <= 0, negative area, ...)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A body with this id already lives in the world
    #[error("body id `{0}` already exists")]
    DuplicateId(String),

    /// No live body has this id
    #[error("no body with id `{0}`")]
    NotFound(String),

    /// Appending to a trajectory log failed
    #[error("trajectory log {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
