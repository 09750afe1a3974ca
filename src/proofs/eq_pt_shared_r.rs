//! N-party plaintext equality proof, shared randomness.
//!
//! A single ephemeral key `C1 = r*G` and `N` components
//! `C2_i = m*G + r*P_i` under distinct public keys, all sharing the same
//! randomness `r`. Proof size only grows by one point per recipient
//! instead of one point plus one scalar, because a single `s_r` response
//! suffices for every branch. Used for broadcast-style transfers where
//! several recipients must all be shown to receive the exact same amount.
//!
//! Grounded on `proof_same_plaintext_multi_shared_r.c`.

use k256::{ProjectivePoint, Scalar};

use crate::consts::SAME_PLAINTEXT_SHARED_R_DOMAIN;
use crate::error::{Error, Result};
use crate::group;
use crate::scalar::{self, SecretScalar};

/// Serialized proof length for `n` recipients: `(n + 1)` points plus 2
/// scalars.
pub fn proof_len(n: usize) -> usize {
    33 * (n + 1) + 64
}

pub struct Proof {
    pub t_r: ProjectivePoint,
    pub t_m: Vec<ProjectivePoint>,
    pub s_m: Scalar,
    pub s_r: Scalar,
}

impl Proof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.t_m.len();
        let mut out = Vec::with_capacity(proof_len(n));
        out.extend_from_slice(&group::serialize33(&self.t_r));
        for p in &self.t_m {
            out.extend_from_slice(&group::serialize33(p));
        }
        out.extend_from_slice(&scalar::to_bytes(&self.s_m));
        out.extend_from_slice(&scalar::to_bytes(&self.s_r));
        out
    }

    pub fn from_bytes(bytes: &[u8], n: usize) -> Result<Self> {
        if bytes.len() != proof_len(n) {
            return Err(Error::InvalidLength {
                expected: proof_len(n),
                actual: bytes.len(),
            });
        }
        let mut offset = 0;
        let t_r = group::parse33(&bytes[offset..offset + 33])?;
        offset += 33;

        let mut t_m = Vec::with_capacity(n);
        for _ in 0..n {
            t_m.push(group::parse33(&bytes[offset..offset + 33])?);
            offset += 33;
        }

        let s_m = scalar::from_canonical_bytes(bytes[offset..offset + 32].try_into().unwrap())?;
        offset += 32;
        let s_r = scalar::from_canonical_bytes(bytes[offset..offset + 32].try_into().unwrap())?;
        for s in [&s_m, &s_r] {
            if !scalar::is_valid_secret(s) {
                return Err(Error::InvalidScalar("eq_pt_shared_r: zero response"));
            }
        }

        Ok(Self { t_r, t_m, s_m, s_r })
    }
}

fn challenge(
    c1: &ProjectivePoint,
    c2: &[ProjectivePoint],
    pks: &[ProjectivePoint],
    t_r: &ProjectivePoint,
    t_m: &[ProjectivePoint],
    context_id: Option<&[u8; 32]>,
) -> Scalar {
    let mut points: Vec<&ProjectivePoint> = Vec::with_capacity(2 + 2 * c2.len() + t_m.len());
    points.push(c1);
    for i in 0..c2.len() {
        points.push(&c2[i]);
        points.push(&pks[i]);
    }
    points.push(t_r);
    for p in t_m {
        points.push(p);
    }
    super::fiat_shamir(SAME_PLAINTEXT_SHARED_R_DOMAIN, &points, context_id)
}

/// Prove that `(c1, c2_vec)` encrypts `amount` identically for every
/// recipient public key in `pks`, using shared randomness `r`.
pub fn prove(
    c1: &ProjectivePoint,
    c2_vec: &[ProjectivePoint],
    pks: &[ProjectivePoint],
    amount: u64,
    r: &SecretScalar,
    context_id: Option<&[u8; 32]>,
) -> Result<Proof> {
    let n = c2_vec.len();
    if pks.len() != n {
        return Err(Error::InvalidInput("eq_pt_shared_r: mismatched vector lengths"));
    }
    if !scalar::is_valid_secret(&r.expose()) {
        return Err(Error::InvalidScalar("eq_pt_shared_r: zero randomness witness"));
    }

    let k_m = SecretScalar::random()?;
    let k_r = SecretScalar::random()?;

    let t_r = group::create(&k_r.expose())?;
    let k_m_g = group::create(&k_m.expose())?;
    let t_m: Vec<ProjectivePoint> = pks.iter().map(|p| k_m_g + *p * k_r.expose()).collect();

    let e = challenge(c1, c2_vec, pks, &t_r, &t_m, context_id);

    let m = super::amount_scalar(amount);
    let s_m = k_m.expose() + e * m;
    let s_r = k_r.expose() + e * r.expose();

    Ok(Proof { t_r, t_m, s_m, s_r })
}

pub fn verify(
    proof: &Proof,
    c1: &ProjectivePoint,
    c2_vec: &[ProjectivePoint],
    pks: &[ProjectivePoint],
    context_id: Option<&[u8; 32]>,
) -> Result<()> {
    let n = c2_vec.len();
    if pks.len() != n || proof.t_m.len() != n {
        return Err(Error::InvalidInput("eq_pt_shared_r: mismatched vector lengths"));
    }

    let e = challenge(c1, c2_vec, pks, &proof.t_r, &proof.t_m, context_id);

    // Eq 1: s_r*G == T_r + e*C1
    let lhs1 = ProjectivePoint::GENERATOR * proof.s_r;
    let rhs1 = proof.t_r + *c1 * e;
    if !group::equal(&lhs1, &rhs1) {
        return Err(Error::ProofRejected);
    }

    let s_m_g = ProjectivePoint::GENERATOR * proof.s_m;

    for i in 0..n {
        // Eq 2: s_m*G + s_r*Pk_i == T_m_i + e*C2_i
        let lhs2 = s_m_g + pks[i] * proof.s_r;
        let rhs2 = proof.t_m[i] + c2_vec[i] * e;
        if !group::equal(&lhs2, &rhs2) {
            return Err(Error::ProofRejected);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::random_nonzero;

    fn setup(n: usize, amount: u64) -> (ProjectivePoint, Vec<ProjectivePoint>, Vec<ProjectivePoint>, SecretScalar) {
        let r = SecretScalar::new(random_nonzero().unwrap());
        let c1 = group::create(&r.expose()).unwrap();
        let mut pks = Vec::new();
        let mut c2 = Vec::new();
        let m = super::super::amount_scalar(amount);
        for _ in 0..n {
            let sk = random_nonzero().unwrap();
            let pk = group::create(&sk).unwrap();
            let shared = pk * r.expose();
            let point = if amount == 0 {
                shared
            } else {
                group::create(&m).unwrap() + shared
            };
            c2.push(point);
            pks.push(pk);
        }
        (c1, c2, pks, r)
    }

    #[test]
    fn honest_proof_verifies_for_several_recipients() {
        let (c1, c2, pks, r) = setup(5, 2500);
        let proof = prove(&c1, &c2, &pks, 2500, &r, None).unwrap();
        assert!(verify(&proof, &c1, &c2, &pks, None).is_ok());
    }

    #[test]
    fn tampered_recipient_component_is_rejected() {
        let (c1, mut c2, pks, r) = setup(3, 10);
        let proof = prove(&c1, &c2, &pks, 10, &r, None).unwrap();
        let (_, other_c2, _, _) = setup(3, 11);
        c2[0] = other_c2[0];
        assert!(verify(&proof, &c1, &c2, &pks, None).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let (c1, c2, pks, r) = setup(2, 6);
        let proof = prove(&c1, &c2, &pks, 6, &r, None).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes, 2).unwrap();
        assert!(verify(&parsed, &c1, &c2, &pks, None).is_ok());
    }
}
