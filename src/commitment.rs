//! Pedersen commitments.
//!
//! `C = v*G + rho*H`, with the zero-value special case `C = rho*H`. `H`
//! is `nums::h_generator()`, the general labeled derivation, cached and
//! keyed for reuse by the Bulletproof generator vectors too.

use k256::{ProjectivePoint, Scalar};

use crate::error::{Error, Result};
use crate::group;
use crate::nums;
use crate::scalar;

/// A Pedersen commitment: just the curve point. Blindings are tracked
/// separately by the caller (usually inside a `SecretScalar`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Commitment(pub ProjectivePoint);

impl Commitment {
    pub fn to_bytes(&self) -> [u8; 33] {
        group::serialize33(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(group::parse33(bytes)?))
    }
}

// Ledger-side transport convenience only, the wire format is always the
// 33-byte compressed point, same as [`Commitment::to_bytes`]/`from_bytes`.
#[cfg(feature = "serde")]
impl serde::Serialize for Commitment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Commitment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = <Vec<u8> as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

fn h() -> ProjectivePoint {
    nums::h_generator()
}

/// `C = v*G + rho*H`. `rho` must be nonzero (a zero blinding defeats hiding
/// and indicates a broken randomness source upstream).
pub fn commit(value: u64, rho: &Scalar) -> Result<Commitment> {
    if !scalar::is_valid_secret(rho) {
        return Err(Error::InvalidScalar("commitment blinding must be nonzero"));
    }

    let blinding_term = group::tweak_mul(&h(), rho)?;
    let point = if value == 0 {
        blinding_term
    } else {
        let v_scalar = Scalar::from(value);
        group::tweak_mul(&ProjectivePoint::GENERATOR, &v_scalar)? + blinding_term
    };
    Ok(Commitment(point))
}

/// Recompute `v*G + rho*H` and check it equals `commitment`.
pub fn verify_opening(commitment: &Commitment, value: u64, rho: &Scalar) -> Result<bool> {
    let recomputed = commit(value, rho)?;
    Ok(group::equal(&commitment.0, &recomputed.0))
}

/// `C1 + C2`, homomorphically committing to `v1 + v2` under blinding
/// `rho1 + rho2`.
pub fn add(c1: &Commitment, c2: &Commitment) -> Commitment {
    Commitment(c1.0 + c2.0)
}

/// `C1 - C2`, homomorphically committing to `v1 - v2` under blinding
/// `rho1 - rho2`.
pub fn sub(c1: &Commitment, c2: &Commitment) -> Commitment {
    Commitment(c1.0 - c2.0)
}

/// The independent generator `H`, exposed for callers (the Bulletproof
/// module, the linkage proof) that need to build expressions over it
/// directly rather than through [`commit`].
pub fn h_generator() -> ProjectivePoint {
    h()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::random_nonzero;

    #[test]
    fn commit_and_verify_round_trips() {
        let rho = random_nonzero().unwrap();
        let c = commit(100, &rho).unwrap();
        assert!(verify_opening(&c, 100, &rho).unwrap());
        assert!(!verify_opening(&c, 101, &rho).unwrap());
    }

    #[test]
    fn zero_value_commitment_is_blinding_only() {
        let rho = random_nonzero().unwrap();
        let c = commit(0, &rho).unwrap();
        let expected = group::tweak_mul(&h(), &rho).unwrap();
        assert!(group::equal(&c.0, &expected));
    }

    #[test]
    fn zero_blinding_is_rejected() {
        assert!(commit(5, &Scalar::ZERO).is_err());
    }

    #[test]
    fn homomorphic_addition_matches_summed_opening() {
        let r1 = random_nonzero().unwrap();
        let r2 = random_nonzero().unwrap();
        let c1 = commit(100, &r1).unwrap();
        let c2 = commit(50, &r2).unwrap();
        let sum = add(&c1, &c2);
        assert!(verify_opening(&sum, 150, &(r1 + r2)).unwrap());
    }

    #[test]
    fn homomorphic_subtraction_matches_diffed_opening() {
        let r1 = random_nonzero().unwrap();
        let r2 = random_nonzero().unwrap();
        let c1 = commit(100, &r1).unwrap();
        let c2 = commit(50, &r2).unwrap();
        let diff = sub(&c1, &c2);
        assert!(verify_opening(&diff, 50, &(r1 - r2)).unwrap());
    }

    #[test]
    fn wire_round_trip() {
        let rho = random_nonzero().unwrap();
        let c = commit(42, &rho).unwrap();
        let bytes = c.to_bytes();
        let parsed = Commitment::from_bytes(&bytes).unwrap();
        assert!(group::equal(&c.0, &parsed.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let rho = random_nonzero().unwrap();
        let c = commit(42, &rho).unwrap();
        let json = serde_json::to_vec(&c).unwrap();
        let parsed: Commitment = serde_json::from_slice(&json).unwrap();
        assert!(group::equal(&c.0, &parsed.0));
    }
}
