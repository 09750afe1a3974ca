//! N-party plaintext equality proof, distinct randomness.
//!
//! Generalizes [`super::eq_pt_same`] to `N` ciphertexts `(R_i, S_i)` under
//! public keys `P_i`, each with its own randomness `r_i`, all proved to
//! encrypt the same `m`. Used for fan-out transactions where one value
//! must be shown consistent against several independently-encrypted
//! destinations. Shares its domain tag with the two-party variant
//! intentionally (see DESIGN.md).
//!
//! Grounded on `proof_same_plaintext_multi.c`.

use k256::{ProjectivePoint, Scalar};

use crate::consts::SAME_PLAINTEXT_DOMAIN;
use crate::elgamal::Ciphertext;
use crate::error::{Error, Result};
use crate::group;
use crate::scalar::{self, SecretScalar};

/// Serialized proof length for `n` recipients: `(1 + 2n)` points plus
/// `(1 + n)` scalars.
pub fn proof_len(n: usize) -> usize {
    (1 + 2 * n) * 33 + (1 + n) * 32
}

pub struct Proof {
    pub t_m: ProjectivePoint,
    pub t_r_g: Vec<ProjectivePoint>,
    pub t_r_p: Vec<ProjectivePoint>,
    pub s_m: Scalar,
    pub s_r: Vec<Scalar>,
}

impl Proof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.t_r_g.len();
        let mut out = Vec::with_capacity(proof_len(n));
        out.extend_from_slice(&group::serialize33(&self.t_m));
        for p in &self.t_r_g {
            out.extend_from_slice(&group::serialize33(p));
        }
        for p in &self.t_r_p {
            out.extend_from_slice(&group::serialize33(p));
        }
        out.extend_from_slice(&scalar::to_bytes(&self.s_m));
        for s in &self.s_r {
            out.extend_from_slice(&scalar::to_bytes(s));
        }
        out
    }

    pub fn from_bytes(bytes: &[u8], n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidInput("eq_pt_multi: n must be nonzero"));
        }
        if bytes.len() != proof_len(n) {
            return Err(Error::InvalidLength {
                expected: proof_len(n),
                actual: bytes.len(),
            });
        }

        let mut offset = 0;
        let t_m = group::parse33(&bytes[offset..offset + 33])?;
        offset += 33;

        let mut t_r_g = Vec::with_capacity(n);
        for _ in 0..n {
            t_r_g.push(group::parse33(&bytes[offset..offset + 33])?);
            offset += 33;
        }
        let mut t_r_p = Vec::with_capacity(n);
        for _ in 0..n {
            t_r_p.push(group::parse33(&bytes[offset..offset + 33])?);
            offset += 33;
        }

        let s_m = scalar::from_canonical_bytes(bytes[offset..offset + 32].try_into().unwrap())?;
        offset += 32;
        if !scalar::is_valid_secret(&s_m) {
            return Err(Error::InvalidScalar("eq_pt_multi: zero s_m"));
        }

        let mut s_r = Vec::with_capacity(n);
        for _ in 0..n {
            let s = scalar::from_canonical_bytes(bytes[offset..offset + 32].try_into().unwrap())?;
            if !scalar::is_valid_secret(&s) {
                return Err(Error::InvalidScalar("eq_pt_multi: zero s_r"));
            }
            s_r.push(s);
            offset += 32;
        }

        Ok(Self {
            t_m,
            t_r_g,
            t_r_p,
            s_m,
            s_r,
        })
    }
}

fn challenge(
    r: &[ProjectivePoint],
    s: &[ProjectivePoint],
    pk: &[ProjectivePoint],
    t_m: &ProjectivePoint,
    t_r_g: &[ProjectivePoint],
    t_r_p: &[ProjectivePoint],
    context_id: Option<&[u8; 32]>,
) -> Scalar {
    let mut points: Vec<&ProjectivePoint> = Vec::with_capacity(3 * r.len() + 1 + 2 * t_r_g.len());
    for i in 0..r.len() {
        points.push(&r[i]);
        points.push(&s[i]);
        points.push(&pk[i]);
    }
    points.push(t_m);
    for i in 0..t_r_g.len() {
        points.push(&t_r_g[i]);
        points.push(&t_r_p[i]);
    }
    super::fiat_shamir(SAME_PLAINTEXT_DOMAIN, &points, context_id)
}

/// Prove that every ciphertext `cts[i]` (under `pks[i]`, randomness
/// `rs[i]`) encrypts `amount`. All slices must have the same nonzero
/// length.
pub fn prove(
    cts: &[Ciphertext],
    pks: &[ProjectivePoint],
    amount: u64,
    rs: &[SecretScalar],
    context_id: Option<&[u8; 32]>,
) -> Result<Proof> {
    let n = cts.len();
    if n == 0 || pks.len() != n || rs.len() != n {
        return Err(Error::InvalidInput("eq_pt_multi: mismatched vector lengths"));
    }

    let k_m = SecretScalar::random()?;
    let t_m = group::create(&k_m.expose())?;

    let mut k_r = Vec::with_capacity(n);
    let mut t_r_g = Vec::with_capacity(n);
    let mut t_r_p = Vec::with_capacity(n);
    for i in 0..n {
        let k = SecretScalar::random()?;
        t_r_g.push(group::create(&k.expose())?);
        t_r_p.push(pks[i] * k.expose());
        k_r.push(k);
    }

    let r_points: Vec<ProjectivePoint> = cts.iter().map(|c| c.c1).collect();
    let s_points: Vec<ProjectivePoint> = cts.iter().map(|c| c.c2).collect();
    let e = challenge(&r_points, &s_points, pks, &t_m, &t_r_g, &t_r_p, context_id);

    let m = super::amount_scalar(amount);
    let s_m = k_m.expose() + e * m;
    let s_r: Vec<Scalar> = (0..n).map(|i| k_r[i].expose() + e * rs[i].expose()).collect();

    Ok(Proof {
        t_m,
        t_r_g,
        t_r_p,
        s_m,
        s_r,
    })
}

pub fn verify(
    proof: &Proof,
    cts: &[Ciphertext],
    pks: &[ProjectivePoint],
    context_id: Option<&[u8; 32]>,
) -> Result<()> {
    let n = cts.len();
    if n == 0 || pks.len() != n || proof.t_r_g.len() != n || proof.t_r_p.len() != n || proof.s_r.len() != n {
        return Err(Error::InvalidInput("eq_pt_multi: mismatched vector lengths"));
    }

    let r_points: Vec<ProjectivePoint> = cts.iter().map(|c| c.c1).collect();
    let s_points: Vec<ProjectivePoint> = cts.iter().map(|c| c.c2).collect();
    let e = challenge(&r_points, &s_points, pks, &proof.t_m, &proof.t_r_g, &proof.t_r_p, context_id);

    let s_m_g = ProjectivePoint::GENERATOR * proof.s_m;

    for i in 0..n {
        // Eq 1: s_r_i*G == T_r_G_i + e*R_i
        let lhs1 = ProjectivePoint::GENERATOR * proof.s_r[i];
        let rhs1 = proof.t_r_g[i] + cts[i].c1 * e;
        if !group::equal(&lhs1, &rhs1) {
            return Err(Error::ProofRejected);
        }

        // Eq 2: s_m*G + s_r_i*Pk_i == T_m + T_r_P_i + e*S_i
        let lhs2 = s_m_g + pks[i] * proof.s_r[i];
        let rhs2 = proof.t_m + proof.t_r_p[i] + cts[i].c2 * e;
        if !group::equal(&lhs2, &rhs2) {
            return Err(Error::ProofRejected);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal;
    use crate::scalar::random_nonzero;

    fn setup(n: usize, amount: u64) -> (Vec<Ciphertext>, Vec<ProjectivePoint>, Vec<SecretScalar>) {
        let mut cts = Vec::new();
        let mut pks = Vec::new();
        let mut rs = Vec::new();
        for _ in 0..n {
            let sk = random_nonzero().unwrap();
            let pk = group::create(&sk).unwrap();
            let r = SecretScalar::new(random_nonzero().unwrap());
            cts.push(elgamal::encrypt(&pk, amount, &r.expose()).unwrap());
            pks.push(pk);
            rs.push(r);
        }
        (cts, pks, rs)
    }

    #[test]
    fn honest_proof_verifies_for_several_recipients() {
        let (cts, pks, rs) = setup(4, 1000);
        let proof = prove(&cts, &pks, 1000, &rs, None).unwrap();
        assert!(verify(&proof, &cts, &pks, None).is_ok());
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let (mut cts, pks, rs) = setup(3, 50);
        let proof = prove(&cts, &pks, 50, &rs, None).unwrap();
        let (other_cts, _, _) = setup(3, 51);
        cts[1] = other_cts[1];
        assert!(verify(&proof, &cts, &pks, None).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let (cts, pks, rs) = setup(2, 8);
        let proof = prove(&cts, &pks, 8, &rs, None).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes, 2).unwrap();
        assert!(verify(&parsed, &cts, &pks, None).is_ok());
    }
}
