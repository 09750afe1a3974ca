//! Proof that an ElGamal ciphertext encrypts a known plaintext.
//!
//! Proves knowledge of `r` such that `C1 = r*G` and `C2 = m*G + r*P` for a
//! publicly revealed `m`, used e.g. when the issuer proves a ciphertext
//! matches a revealed amount during a clawback, or when a sender proves
//! their stated transfer amount matches the ciphertext they sent.
//!
//! The challenge omits `m*G` from the transcript entirely when `m == 0`
//! (there is no point to hash), mirroring the reference's conditional
//! `mG` pointer.
//!
//! Grounded on `equality_proof.c`.

use k256::{ProjectivePoint, Scalar};

use crate::consts::EQ_PT_DOMAIN;
use crate::elgamal::Ciphertext;
use crate::error::{Error, Result};
use crate::group;
use crate::scalar::{self, SecretScalar};

pub const PROOF_LEN: usize = 98;

pub struct Proof {
    pub t1: ProjectivePoint,
    pub t2: ProjectivePoint,
    pub s: Scalar,
}

impl Proof {
    pub fn to_bytes(&self) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        out[..33].copy_from_slice(&group::serialize33(&self.t1));
        out[33..66].copy_from_slice(&group::serialize33(&self.t2));
        out[66..].copy_from_slice(&scalar::to_bytes(&self.s));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PROOF_LEN {
            return Err(Error::InvalidLength {
                expected: PROOF_LEN,
                actual: bytes.len(),
            });
        }
        let t1 = group::parse33(&bytes[..33])?;
        let t2 = group::parse33(&bytes[33..66])?;
        let s = scalar::from_canonical_bytes(bytes[66..98].try_into().unwrap())?;
        if !scalar::is_valid_secret(&s) {
            return Err(Error::InvalidScalar("eq_pt: zero response"));
        }
        Ok(Self { t1, t2, s })
    }
}

fn amount_point(amount: u64) -> Result<Option<ProjectivePoint>> {
    if amount == 0 {
        Ok(None)
    } else {
        Ok(Some(group::create(&super::amount_scalar(amount))?))
    }
}

fn challenge(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    m_g: Option<&ProjectivePoint>,
    t1: &ProjectivePoint,
    t2: &ProjectivePoint,
    context_id: Option<&[u8; 32]>,
) -> Scalar {
    let mut points: Vec<&ProjectivePoint> = vec![&ct.c1, &ct.c2, pk];
    if let Some(m_g) = m_g {
        points.push(m_g);
    }
    points.push(t1);
    points.push(t2);
    super::fiat_shamir(EQ_PT_DOMAIN, &points, context_id)
}

/// Prove that `ct` encrypts `amount` under `pk`, given the randomness `r`
/// used to produce it.
pub fn prove(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    amount: u64,
    r: &SecretScalar,
    context_id: Option<&[u8; 32]>,
) -> Result<Proof> {
    if !scalar::is_valid_secret(&r.expose()) {
        return Err(Error::InvalidScalar("eq_pt: zero randomness witness"));
    }

    let t = SecretScalar::random()?;
    let t1 = group::create(&t.expose())?;
    let t2 = *pk * t.expose();

    let m_g = amount_point(amount)?;
    let e = challenge(ct, pk, m_g.as_ref(), &t1, &t2, context_id);
    let s = t.expose() + e * r.expose();

    Ok(Proof { t1, t2, s })
}

/// Verify `s*G == T1 + e*C1` and `s*P == T2 + e*(C2 - m*G)`.
pub fn verify(
    proof: &Proof,
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    amount: u64,
    context_id: Option<&[u8; 32]>,
) -> Result<()> {
    let m_g = amount_point(amount)?;
    let e = challenge(ct, pk, m_g.as_ref(), &proof.t1, &proof.t2, context_id);

    let lhs1 = ProjectivePoint::GENERATOR * proof.s;
    let rhs1 = proof.t1 + ct.c1 * e;
    if !group::equal(&lhs1, &rhs1) {
        return Err(Error::ProofRejected);
    }

    let y = match m_g {
        None => ct.c2,
        Some(m_g) => ct.c2 - m_g,
    };
    let lhs2 = *pk * proof.s;
    let rhs2 = proof.t2 + y * e;
    if !group::equal(&lhs2, &rhs2) {
        return Err(Error::ProofRejected);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal;
    use crate::scalar::random_nonzero;

    fn setup(amount: u64) -> (Ciphertext, ProjectivePoint, SecretScalar) {
        let sk = random_nonzero().unwrap();
        let pk = group::create(&sk).unwrap();
        let r = SecretScalar::new(random_nonzero().unwrap());
        let ct = elgamal::encrypt(&pk, amount, &r.expose()).unwrap();
        (ct, pk, r)
    }

    #[test]
    fn honest_proof_verifies_nonzero_amount() {
        let (ct, pk, r) = setup(777);
        let proof = prove(&ct, &pk, 777, &r, None).unwrap();
        assert!(verify(&proof, &ct, &pk, 777, None).is_ok());
    }

    #[test]
    fn honest_proof_verifies_zero_amount() {
        let (ct, pk, r) = setup(0);
        let proof = prove(&ct, &pk, 0, &r, None).unwrap();
        assert!(verify(&proof, &ct, &pk, 0, None).is_ok());
    }

    #[test]
    fn wrong_claimed_amount_is_rejected() {
        let (ct, pk, r) = setup(777);
        let proof = prove(&ct, &pk, 777, &r, None).unwrap();
        assert!(verify(&proof, &ct, &pk, 778, None).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let (ct, pk, r) = setup(5);
        let proof = prove(&ct, &pk, 5, &r, None).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes).unwrap();
        assert!(verify(&parsed, &ct, &pk, 5, None).is_ok());
    }
}
