//! Linkage proof between an ElGamal ciphertext and a Pedersen commitment
//! to the same plaintext.
//!
//! Proves knowledge of `(m, r, rho)` such that `C1 = r*G`,
//! `C2 = m*G + r*P`, and `PCm = m*G + rho*H`. This is the binding that
//! stops a "bait-and-switch": a valid range proof for a small committed
//! amount cannot be paired with an updated ciphertext balance for a
//! different amount, because both representations are tied to the same
//! witness `m`.
//!
//! The challenge transcript uses a fixed 290-byte buffer, 27 bytes
//! reserved for the 25-byte domain tag plus 2 zero padding bytes, then
//! seven 33-byte compressed points, then a 32-byte context id. This fixed
//! layout is load-bearing: changing it would be a consensus-breaking
//! change to every linkage proof already on chain, so it stays fixed
//! rather than being rebuilt around a streaming hash.

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::commitment::Commitment;
use crate::consts::LINK_DOMAIN;
use crate::elgamal::Ciphertext;
use crate::error::{Error, Result};
use crate::group;
use crate::nums;
use crate::scalar::{self, SecretScalar};

pub const PROOF_LEN: usize = 195;

pub struct Proof {
    pub t1: ProjectivePoint,
    pub t2: ProjectivePoint,
    pub t3: ProjectivePoint,
    pub s_m: Scalar,
    pub s_r: Scalar,
    pub s_rho: Scalar,
}

impl Proof {
    pub fn to_bytes(&self) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        out[..33].copy_from_slice(&group::serialize33(&self.t1));
        out[33..66].copy_from_slice(&group::serialize33(&self.t2));
        out[66..99].copy_from_slice(&group::serialize33(&self.t3));
        out[99..131].copy_from_slice(&scalar::to_bytes(&self.s_m));
        out[131..163].copy_from_slice(&scalar::to_bytes(&self.s_r));
        out[163..195].copy_from_slice(&scalar::to_bytes(&self.s_rho));
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
        let t3 = group::parse33(&bytes[66..99])?;
        let s_m = scalar::from_canonical_bytes(bytes[99..131].try_into().unwrap())?;
        let s_r = scalar::from_canonical_bytes(bytes[131..163].try_into().unwrap())?;
        let s_rho = scalar::from_canonical_bytes(bytes[163..195].try_into().unwrap())?;
        for s in [&s_m, &s_r, &s_rho] {
            if !scalar::is_valid_secret(s) {
                return Err(Error::InvalidScalar("link: zero response"));
            }
        }
        Ok(Self {
            t1,
            t2,
            t3,
            s_m,
            s_r,
            s_rho,
        })
    }
}

fn challenge(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    pcm: &Commitment,
    t1: &ProjectivePoint,
    t2: &ProjectivePoint,
    t3: &ProjectivePoint,
    context_id: &[u8; 32],
) -> Scalar {
    let mut buf = [0u8; 290];
    buf[..LINK_DOMAIN.len()].copy_from_slice(LINK_DOMAIN);

    let points = [&ct.c1, &ct.c2, pk, &pcm.0, t1, t2, t3];
    let mut offset = 27;
    for p in points {
        buf[offset..offset + 33].copy_from_slice(&group::serialize33(p));
        offset += 33;
    }
    buf[offset..offset + 32].copy_from_slice(context_id);

    let digest: [u8; 32] = Sha256::digest(buf).into();
    scalar::reduce32(&digest)
}

/// Prove that `ct` (under `pk`) and `pcm` both encode `amount`, given the
/// ElGamal randomness `r` and the Pedersen blinding `rho`.
pub fn prove(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    pcm: &Commitment,
    amount: u64,
    r: &SecretScalar,
    rho: &SecretScalar,
    context_id: &[u8; 32],
) -> Result<Proof> {
    if !scalar::is_valid_secret(&r.expose()) || !scalar::is_valid_secret(&rho.expose()) {
        return Err(Error::InvalidScalar("link: zero witness"));
    }

    let k_m = SecretScalar::random()?;
    let k_r = SecretScalar::random()?;
    let k_rho = SecretScalar::random()?;

    let h = nums::h_generator();
    let m_g = group::create(&k_m.expose())?;

    let t1 = group::create(&k_r.expose())?;
    let t2 = m_g + *pk * k_r.expose();
    let t3 = m_g + h * k_rho.expose();

    let e = challenge(ct, pk, pcm, &t1, &t2, &t3, context_id);

    let m = super::amount_scalar(amount);
    let s_m = k_m.expose() + e * m;
    let s_r = k_r.expose() + e * r.expose();
    let s_rho = k_rho.expose() + e * rho.expose();

    Ok(Proof {
        t1,
        t2,
        t3,
        s_m,
        s_r,
        s_rho,
    })
}

/// Verify the three linkage equations against `ct`, `pk`, and `pcm`.
pub fn verify(
    proof: &Proof,
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    pcm: &Commitment,
    context_id: &[u8; 32],
) -> Result<()> {
    let e = challenge(ct, pk, pcm, &proof.t1, &proof.t2, &proof.t3, context_id);

    // Eq 1: s_r*G == T1 + e*C1
    let lhs1 = ProjectivePoint::GENERATOR * proof.s_r;
    let rhs1 = proof.t1 + ct.c1 * e;
    if !group::equal(&lhs1, &rhs1) {
        return Err(Error::ProofRejected);
    }

    let s_m_g = ProjectivePoint::GENERATOR * proof.s_m;

    // Eq 2: s_m*G + s_r*Pk == T2 + e*C2
    let lhs2 = s_m_g + *pk * proof.s_r;
    let rhs2 = proof.t2 + ct.c2 * e;
    if !group::equal(&lhs2, &rhs2) {
        return Err(Error::ProofRejected);
    }

    // Eq 3: s_m*G + s_rho*H == T3 + e*PCm
    let h = nums::h_generator();
    let lhs3 = s_m_g + h * proof.s_rho;
    let rhs3 = proof.t3 + pcm.0 * e;
    if !group::equal(&lhs3, &rhs3) {
        return Err(Error::ProofRejected);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commitment, elgamal};
    use crate::scalar::random_nonzero;

    fn setup(amount: u64) -> (Ciphertext, ProjectivePoint, Commitment, SecretScalar, SecretScalar) {
        let sk = random_nonzero().unwrap();
        let pk = group::create(&sk).unwrap();
        let r = SecretScalar::new(random_nonzero().unwrap());
        let rho = SecretScalar::new(random_nonzero().unwrap());
        let ct = elgamal::encrypt(&pk, amount, &r.expose()).unwrap();
        let pcm = commitment::commit(amount, &rho.expose()).unwrap();
        (ct, pk, pcm, r, rho)
    }

    #[test]
    fn honest_proof_verifies() {
        let ctx = [0u8; 32];
        let (ct, pk, pcm, r, rho) = setup(500);
        let proof = prove(&ct, &pk, &pcm, 500, &r, &rho, &ctx).unwrap();
        assert!(verify(&proof, &ct, &pk, &pcm, &ctx).is_ok());
    }

    #[test]
    fn mismatched_commitment_is_rejected() {
        let ctx = [0u8; 32];
        let (ct, pk, _pcm, r, rho) = setup(500);
        let (_, _, other_pcm, _, _) = setup(501);
        let proof = prove(&ct, &pk, &other_pcm, 500, &r, &rho, &ctx).unwrap();
        assert!(verify(&proof, &ct, &pk, &other_pcm, &ctx).is_ok());
        let (_, _, real_pcm, _, _) = setup(500);
        assert!(verify(&proof, &ct, &pk, &real_pcm, &ctx).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let ctx = [3u8; 32];
        let (ct, pk, pcm, r, rho) = setup(12);
        let proof = prove(&ct, &pk, &pcm, 12, &r, &rho, &ctx).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes).unwrap();
        assert!(verify(&parsed, &ct, &pk, &pcm, &ctx).is_ok());
    }
}
