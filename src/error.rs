//! Error types for the confidential transfer proof engine.

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The three-kind error taxonomy surfaced to callers, detailed enough for
/// diagnostics via the individual variants but classifiable via [`Error::kind`].
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong-length byte buffer.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A 33-byte buffer did not parse to a valid curve point.
    #[error("invalid point encoding")]
    InvalidPoint,

    /// A 32-byte buffer is not a canonical, non-zero scalar in (0, q).
    #[error("invalid scalar: {0}")]
    InvalidScalar(&'static str),

    /// `m` (aggregation width) is not a power of two, or is zero.
    #[error("aggregation width must be a nonzero power of two, got {0}")]
    InvalidAggregationWidth(usize),

    /// Any other malformed-input condition (wrong proof length, mismatched
    /// vector lengths, etc).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Verification failed: an equation mismatch, a re-derived challenge
    /// landing outside (0, q), or an IPA invariant violation.
    #[error("proof rejected")]
    ProofRejected,

    /// The injected randomness source failed to deliver a valid scalar
    /// within its rejection-sampling budget. Prover-only.
    #[error("randomness source exhausted its rejection budget")]
    RandomnessFailure,
}

/// Coarse three-valued classification: invalid input, a rejected proof,
/// or an exhausted randomness source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ProofRejected,
    RandomnessFailure,
}

impl Error {
    /// Classify this error into the three-kind model external callers see.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLength { .. }
            | Error::InvalidPoint
            | Error::InvalidScalar(_)
            | Error::InvalidAggregationWidth(_)
            | Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::ProofRejected => ErrorKind::ProofRejected,
            Error::RandomnessFailure => ErrorKind::RandomnessFailure,
        }
    }
}

/// Three-valued status returned by the ledger adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadProof,
    Internal,
}

impl From<Error> for Status {
    fn from(e: Error) -> Self {
        match e.kind() {
            ErrorKind::ProofRejected => Status::BadProof,
            ErrorKind::InvalidInput | ErrorKind::RandomnessFailure => Status::Internal,
        }
    }
}
