//! Scalar field F_q arithmetic.
//!
//! Thin, typed front door over [`k256::Scalar`], which is itself
//! constant-time by construction, so this module's job is canonical
//! encode/decode, `reduce32`, and the secret-scrubbing wrapper type.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, Scalar, U256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Parse a canonical 32-byte big-endian buffer as a scalar mod q.
///
/// Returns `InvalidScalar` if the buffer is not strictly less than the
/// group order (non-canonical encodings are rejected, not silently
/// reduced, use [`reduce32`] when reduction is the intended behavior).
pub fn from_canonical_bytes(bytes: &[u8; 32]) -> Result<Scalar> {
    Option::from(Scalar::from_repr(*FieldBytes::from_slice(bytes)))
        .ok_or(Error::InvalidScalar("not canonical (>= group order)"))
}

/// Canonical 32-byte big-endian encoding of a scalar.
pub fn to_bytes(s: &Scalar) -> [u8; 32] {
    s.to_bytes().into()
}

/// Reduce an arbitrary 32-byte buffer modulo q, always producing a
/// canonical scalar (used for every Fiat-Shamir challenge derivation,
/// where a raw SHA-256 digest need not already be < q).
pub fn reduce32(bytes: &[u8; 32]) -> Scalar {
    let as_uint = U256::from_be_slice(bytes);
    Scalar::reduce(as_uint)
}

/// `0 < s < q`.
pub fn is_valid_secret(s: &Scalar) -> bool {
    !bool::from(s.is_zero())
}

/// Negate a scalar mod q.
pub fn negate(s: &Scalar) -> Scalar {
    -s
}

/// Invert a scalar mod q. Constant-time; caller must ensure `s` is nonzero
/// (inverting zero returns zero via `CtOption`, which is never a valid
/// secret and will fail `is_valid_secret`).
pub fn invert(s: &Scalar) -> Result<Scalar> {
    Option::from(s.invert()).ok_or(Error::InvalidScalar("cannot invert zero"))
}

/// Rejection-sample a valid, nonzero secret scalar from a caller-supplied
/// source of uniform 32-byte randomness.
///
/// The core treats randomness as an injectable collaborator: `draw` is
/// called until it yields a canonical, nonzero scalar, or until
/// `max_attempts` is exhausted (in which case `RandomnessFailure` is
/// returned: the randomness source refused to deliver a valid scalar
/// within its rejection budget).
pub fn sample_nonzero(
    mut draw: impl FnMut() -> [u8; 32],
    max_attempts: usize,
) -> Result<Scalar> {
    for _ in 0..max_attempts {
        let candidate = draw();
        if let Ok(s) = from_canonical_bytes(&candidate) {
            if is_valid_secret(&s) {
                return Ok(s);
            }
        }
    }
    Err(Error::RandomnessFailure)
}

/// Draw a nonzero secret scalar using the OS randomness source.
pub fn random_nonzero() -> Result<Scalar> {
    sample_nonzero(
        || {
            use rand::RngCore;
            let mut buf = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut buf);
            buf
        },
        // A single draw fails to be canonical/nonzero with probability
        // astronomically close to zero; a handful of retries is ample
        // headroom without masking a genuinely broken RNG.
        16,
    )
}

/// A scalar known to be secret (blinding factor, nonce, witness, private
/// key). Scrubbed from memory on every exit path, including error paths,
/// via `Drop`.
///
/// This is an RAII guard: secrets get scrubbed automatically instead of
/// relying on a manual cleanse call at every early-return site.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar(InnerScalar);

// `k256::Scalar` does not implement `Zeroize` directly; store its raw
// bytes so the derive can wipe them, and re-derive the `Scalar` on access.
#[derive(Clone, Zeroize)]
struct InnerScalar([u8; 32]);

impl SecretScalar {
    pub fn new(s: Scalar) -> Self {
        Self(InnerScalar(to_bytes(&s)))
    }

    pub fn random() -> Result<Self> {
        Ok(Self::new(random_nonzero()?))
    }

    pub fn expose(&self) -> Scalar {
        // The bytes were produced by `to_bytes` of a valid `Scalar`, so
        // this reparse cannot fail.
        from_canonical_bytes(&self.0 .0).expect("SecretScalar invariant violated")
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0 .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_sanity_two_times_three_is_six() {
        let two = Scalar::from(2u64);
        let three = Scalar::from(3u64);
        let six = Scalar::from(6u64);
        assert_eq!(two * three, six);
    }

    #[test]
    fn reduce32_is_canonical_for_arbitrary_bytes() {
        let all_ff = [0xffu8; 32];
        let reduced = reduce32(&all_ff);
        // Must round-trip through canonical encode/decode.
        let bytes = to_bytes(&reduced);
        assert_eq!(from_canonical_bytes(&bytes).unwrap(), reduced);
    }

    #[test]
    fn zero_is_never_a_valid_secret() {
        assert!(!is_valid_secret(&Scalar::ZERO));
    }

    #[test]
    fn secret_scalar_round_trips() {
        let s = random_nonzero().unwrap();
        let wrapped = SecretScalar::new(s);
        assert_eq!(wrapped.expose(), s);
    }

    #[test]
    fn negate_then_add_is_zero() {
        let s = random_nonzero().unwrap();
        assert_eq!(s + negate(&s), Scalar::ZERO);
    }
}
