//! Schnorr proof of knowledge of a secret key.
//!
//! Proves possession of `sk` for `pk = sk*G` without revealing it, used at
//! account registration to block rogue-key attacks and to demonstrate the
//! registrant actually controls the ElGamal key they're registering.
//!
//! Grounded on `proof_pok_sk.c`.

use k256::{ProjectivePoint, Scalar};

use crate::consts::POK_SK_DOMAIN;
use crate::error::{Error, Result};
use crate::group;
use crate::scalar::{self, SecretScalar};

pub const PROOF_LEN: usize = 65;

pub struct Proof {
    pub t: ProjectivePoint,
    pub s: Scalar,
}

impl Proof {
    pub fn to_bytes(&self) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        out[..33].copy_from_slice(&group::serialize33(&self.t));
        out[33..].copy_from_slice(&scalar::to_bytes(&self.s));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PROOF_LEN {
            return Err(Error::InvalidLength {
                expected: PROOF_LEN,
                actual: bytes.len(),
            });
        }
        let t = group::parse33(&bytes[..33])?;
        let s = scalar::from_canonical_bytes(bytes[33..65].try_into().unwrap())?;
        if !scalar::is_valid_secret(&s) {
            return Err(Error::InvalidScalar("pok_sk: zero response"));
        }
        Ok(Self { t, s })
    }
}

fn challenge(pk: &ProjectivePoint, t: &ProjectivePoint, context_id: Option<&[u8; 32]>) -> Scalar {
    super::fiat_shamir(POK_SK_DOMAIN, &[pk, t], context_id)
}

/// Prove knowledge of `sk` such that `pk = sk*G`.
pub fn prove(pk: &ProjectivePoint, sk: &SecretScalar, context_id: Option<&[u8; 32]>) -> Result<Proof> {
    let k = SecretScalar::random()?;
    let t = group::create(&k.expose())?;
    let e = challenge(pk, &t, context_id);
    let s = k.expose() + e * sk.expose();
    Ok(Proof { t, s })
}

/// Verify `s*G == T + e*Pk`.
pub fn verify(proof: &Proof, pk: &ProjectivePoint, context_id: Option<&[u8; 32]>) -> Result<()> {
    let e = challenge(pk, &proof.t, context_id);
    let lhs = ProjectivePoint::GENERATOR * proof.s;
    let rhs = proof.t + *pk * e;
    if group::equal(&lhs, &rhs) {
        Ok(())
    } else {
        Err(Error::ProofRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::random_nonzero;

    #[test]
    fn honest_proof_verifies() {
        let sk = SecretScalar::new(random_nonzero().unwrap());
        let pk = group::create(&sk.expose()).unwrap();
        let proof = prove(&pk, &sk, None).unwrap();
        assert!(verify(&proof, &pk, None).is_ok());
    }

    #[test]
    fn proof_for_wrong_key_is_rejected() {
        let sk = SecretScalar::new(random_nonzero().unwrap());
        let pk = group::create(&sk.expose()).unwrap();
        let other_pk = group::create(&random_nonzero().unwrap()).unwrap();
        let proof = prove(&pk, &sk, None).unwrap();
        assert!(verify(&proof, &other_pk, None).is_err());
    }

    #[test]
    fn context_id_binds_the_proof() {
        let sk = SecretScalar::new(random_nonzero().unwrap());
        let pk = group::create(&sk.expose()).unwrap();
        let ctx_a = [1u8; 32];
        let ctx_b = [2u8; 32];
        let proof = prove(&pk, &sk, Some(&ctx_a)).unwrap();
        assert!(verify(&proof, &pk, Some(&ctx_a)).is_ok());
        assert!(verify(&proof, &pk, Some(&ctx_b)).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let sk = SecretScalar::new(random_nonzero().unwrap());
        let pk = group::create(&sk.expose()).unwrap();
        let proof = prove(&pk, &sk, None).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes).unwrap();
        assert!(verify(&parsed, &pk, None).is_ok());
    }
}
