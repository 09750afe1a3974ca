//! # Confidential Transfer Proof Engine
//!
//! Zero-knowledge building blocks for confidential token transfers over
//! secp256k1: Pedersen commitments, EC-ElGamal encryption, a family of
//! Fiat-Shamir Sigma proofs binding the two together, and an aggregated
//! Bulletproof range proof, wired to a ledger-facing adapter that never
//! leaks anything more specific than [`error::Status`] across its
//! boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use mpt_confidential_proofs::{commitment, scalar::random_nonzero};
//!
//! let rho = random_nonzero().unwrap();
//! let c = commitment::commit(100, &rho).unwrap();
//! assert!(commitment::verify_opening(&c, 100, &rho).unwrap());
//! ```

pub mod bulletproof;
pub mod commitment;
pub mod consts;
pub mod elgamal;
pub mod error;
pub mod group;
pub mod ledger;
pub mod nums;
pub mod proofs;
pub mod scalar;

pub use error::{Error, ErrorKind, Result, Status};

/// Crate version, read from the package manifest at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
