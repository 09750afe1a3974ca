//! Fiat-Shamir Sigma proofs.
//!
//! Each submodule is a standalone Schnorr-style protocol: sample nonces,
//! commit, derive a challenge by hashing the domain tag and every public
//! input with SHA-256 (reduced mod q via [`crate::scalar::reduce32`]),
//! then respond. Every verify function recomputes the challenge rather
//! than trusting a transmitted one, and treats any equation mismatch or
//! structurally invalid scalar as `Error::ProofRejected`.

pub mod eq_pt;
pub mod eq_pt_multi;
pub mod eq_pt_same;
pub mod eq_pt_shared_r;
pub mod link;
pub mod pok_sk;

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::group;

/// Shared transcript builder: domain tag, then each point serialized
/// compressed (33 bytes), then an optional 32-byte context id, reduced to
/// a scalar challenge. Every proof submodule's challenge function is a
/// thin wrapper around this with its own domain tag and point ordering.
pub(crate) fn fiat_shamir(
    domain: &[u8],
    points: &[&ProjectivePoint],
    context_id: Option<&[u8; 32]>,
) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    for p in points {
        hasher.update(group::serialize33(p));
    }
    if let Some(ctx) = context_id {
        hasher.update(ctx);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    crate::scalar::reduce32(&digest)
}

/// `amount` as a scalar, the big-endian 32-byte encoding of a `u64`, for
/// proofs that bind a plaintext value directly (as opposed to a point
/// `m*G`).
pub(crate) fn amount_scalar(amount: u64) -> Scalar {
    Scalar::from(amount)
}
