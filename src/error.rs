//! Contains the main error type for the library.
use thiserror::Error;

/// The main error type for the library. The bit-timing calculation has its own error type that is contained by this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown CAN controller '{0}'")]
    UnknownController(String),
    #[error("unknown CAN calc bit timing algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("{0} has no data phase")]
    NoDataPhase(String),
    #[error(transparent)]
    BitTiming(#[from] crate::bittiming::Error),
}
