//! Aggregated Bulletproof range proof.
//!
//! Proves that each of `m` committed values lies in `[0, 2^64)` in a
//! single proof of size `292 + 66*log2(64m)` bytes, logarithmic in the
//! aggregate bit width rather than linear in it. This is the hard part of
//! the system: prover and verifier must agree bit-exactly on every
//! transcript byte, every generator derivation, every polynomial
//! coefficient, and every serialization.
//!
//! Unlike the Pedersen commitments in [`crate::commitment`] (which always
//! blind against the fixed NUMS generator `H`), a Bulletproof's per-value
//! commitment `V_j = v_j*G + rho_j*H_base` is blinded against a
//! caller-supplied `H_base`, in this system the recipient account's own
//! ElGamal public key, tying a balance's range proof to the account that
//! owns it. [`commit_value`] is the direct generalization of
//! [`crate::commitment::commit`] to an arbitrary blinding base.
//!
//! The IPA folding itself lives in [`ipa`].

pub mod ipa;

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::consts::{BP_VALUE_BITS, BULLETPROOF_RANGE_DOMAIN};
use crate::error::{Error, Result};
use crate::group;
use crate::nums;
use crate::scalar::{self, SecretScalar};

/// `rounds = log2(64*m)`, the IPA's fold depth; also the number of
/// `(L, R)` pairs in the serialized proof.
pub fn rounds_for(m: usize) -> Result<usize> {
    if m == 0 || !m.is_power_of_two() {
        return Err(Error::InvalidAggregationWidth(m));
    }
    Ok((BP_VALUE_BITS * m).trailing_zeros() as usize)
}

/// `292 + 66*rounds`, the exact wire length of an aggregated proof over
/// `m` values.
pub fn proof_len(m: usize) -> Result<usize> {
    Ok(292 + 66 * rounds_for(m)?)
}

/// `v*G + rho*H_base`, the generalization of [`crate::commitment::commit`]
/// to a caller-chosen blinding base. `rho` must be a valid nonzero
/// secret.
pub fn commit_value(value: u64, rho: &Scalar, h_base: &ProjectivePoint) -> Result<ProjectivePoint> {
    if !scalar::is_valid_secret(rho) {
        return Err(Error::InvalidScalar("bulletproof commitment blinding must be nonzero"));
    }
    let blinding_term = group::tweak_mul(h_base, rho)?;
    if value == 0 {
        return Ok(blinding_term);
    }
    let v_scalar = Scalar::from(value);
    Ok(group::tweak_mul(&ProjectivePoint::GENERATOR, &v_scalar)? + blinding_term)
}

struct Generators {
    g: Vec<ProjectivePoint>,
    h: Vec<ProjectivePoint>,
    u: ProjectivePoint,
}

fn generators(n: usize) -> Generators {
    Generators {
        g: nums::generator_vector(b"G", n),
        h: nums::generator_vector(b"H", n),
        u: nums::hash_to_point(b"BP_U", 0),
    }
}

fn powers(base: Scalar, n: usize) -> Vec<Scalar> {
    let mut out = Vec::with_capacity(n);
    let mut cur = Scalar::from(1u64);
    for _ in 0..n {
        out.push(cur);
        cur = cur * base;
    }
    out
}

fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
    let mut acc = Scalar::from(0u64);
    for (x, y) in a.iter().zip(b.iter()) {
        acc = acc + *x * *y;
    }
    acc
}

fn sum_scalars(v: &[Scalar]) -> Scalar {
    let mut acc = Scalar::from(0u64);
    for s in v {
        acc = acc + *s;
    }
    acc
}

fn hash_points(hasher: &mut Sha256, points: &[ProjectivePoint]) {
    for p in points {
        hasher.update(group::serialize33(p));
    }
}

/// `y = reduce32(SHA256(BULLETPROOF_RANGE_DOMAIN || context_id || V.. || A || S))`.
fn challenge_y(context_id: &[u8; 32], v: &[ProjectivePoint], a: &ProjectivePoint, s: &ProjectivePoint) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(BULLETPROOF_RANGE_DOMAIN);
    hasher.update(context_id);
    hash_points(&mut hasher, v);
    hash_points(&mut hasher, &[*a, *s]);
    let digest: [u8; 32] = hasher.finalize().into();
    scalar::reduce32(&digest)
}

/// Same transcript as [`challenge_y`], with `y` appended.
fn challenge_z(
    context_id: &[u8; 32],
    v: &[ProjectivePoint],
    a: &ProjectivePoint,
    s: &ProjectivePoint,
    y: &Scalar,
) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(BULLETPROOF_RANGE_DOMAIN);
    hasher.update(context_id);
    hash_points(&mut hasher, v);
    hash_points(&mut hasher, &[*a, *s]);
    hasher.update(scalar::to_bytes(y));
    let digest: [u8; 32] = hasher.finalize().into();
    scalar::reduce32(&digest)
}

/// `x = reduce32(SHA256(context_id || A || S || y || z || T1 || T2))`.
fn challenge_x(
    context_id: &[u8; 32],
    a: &ProjectivePoint,
    s: &ProjectivePoint,
    y: &Scalar,
    z: &Scalar,
    t1: &ProjectivePoint,
    t2: &ProjectivePoint,
) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(context_id);
    hash_points(&mut hasher, &[*a, *s]);
    hasher.update(scalar::to_bytes(y));
    hasher.update(scalar::to_bytes(z));
    hash_points(&mut hasher, &[*t1, *t2]);
    let digest: [u8; 32] = hasher.finalize().into();
    scalar::reduce32(&digest)
}

/// `ipa_tid = SHA256(context_id || A || S || T1 || T2 || y || z || x || t_hat)`.
fn ipa_transcript_seed(
    context_id: &[u8; 32],
    a: &ProjectivePoint,
    s: &ProjectivePoint,
    t1: &ProjectivePoint,
    t2: &ProjectivePoint,
    y: &Scalar,
    z: &Scalar,
    x: &Scalar,
    t_hat: &Scalar,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(context_id);
    hash_points(&mut hasher, &[*a, *s, *t1, *t2]);
    hasher.update(scalar::to_bytes(y));
    hasher.update(scalar::to_bytes(z));
    hasher.update(scalar::to_bytes(x));
    hasher.update(scalar::to_bytes(t_hat));
    hasher.finalize().into()
}

/// `ux = reduce32(SHA256(ipa_tid || t_hat))`.
fn ipa_binding_scalar(ipa_tid: &[u8; 32], t_hat: &Scalar) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(ipa_tid);
    hasher.update(scalar::to_bytes(t_hat));
    let digest: [u8; 32] = hasher.finalize().into();
    scalar::reduce32(&digest)
}

/// A serialized aggregated Bulletproof, parsed into its typed parts:
/// `A, S, T1, T2, IPA(L[], R[], a, b), t_hat, tau_x, mu`.
pub struct Proof {
    pub a: ProjectivePoint,
    pub s: ProjectivePoint,
    pub t1: ProjectivePoint,
    pub t2: ProjectivePoint,
    pub ipa: ipa::IpaProof,
    pub t_hat: Scalar,
    pub tau_x: Scalar,
    pub mu: Scalar,
}

impl Proof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let rounds = self.ipa.l.len();
        let mut out = Vec::with_capacity(292 + 66 * rounds);
        out.extend_from_slice(&group::serialize33(&self.a));
        out.extend_from_slice(&group::serialize33(&self.s));
        out.extend_from_slice(&group::serialize33(&self.t1));
        out.extend_from_slice(&group::serialize33(&self.t2));
        for l in &self.ipa.l {
            out.extend_from_slice(&group::serialize33(l));
        }
        for r in &self.ipa.r {
            out.extend_from_slice(&group::serialize33(r));
        }
        out.extend_from_slice(&scalar::to_bytes(&self.ipa.a));
        out.extend_from_slice(&scalar::to_bytes(&self.ipa.b));
        out.extend_from_slice(&scalar::to_bytes(&self.t_hat));
        out.extend_from_slice(&scalar::to_bytes(&self.tau_x));
        out.extend_from_slice(&scalar::to_bytes(&self.mu));
        out
    }

    pub fn from_bytes(bytes: &[u8], m: usize) -> Result<Self> {
        let rounds = rounds_for(m)?;
        let expected = 292 + 66 * rounds;
        if bytes.len() != expected {
            return Err(Error::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut off = 0usize;
        let a = group::parse33(&bytes[off..off + 33])?;
        off += 33;
        let s = group::parse33(&bytes[off..off + 33])?;
        off += 33;
        let t1 = group::parse33(&bytes[off..off + 33])?;
        off += 33;
        let t2 = group::parse33(&bytes[off..off + 33])?;
        off += 33;

        let mut l = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            l.push(group::parse33(&bytes[off..off + 33])?);
            off += 33;
        }
        let mut r = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            r.push(group::parse33(&bytes[off..off + 33])?);
            off += 33;
        }

        let a_final = scalar::from_canonical_bytes(bytes[off..off + 32].try_into().unwrap())?;
        off += 32;
        let b_final = scalar::from_canonical_bytes(bytes[off..off + 32].try_into().unwrap())?;
        off += 32;
        let t_hat = scalar::from_canonical_bytes(bytes[off..off + 32].try_into().unwrap())?;
        off += 32;
        let tau_x = scalar::from_canonical_bytes(bytes[off..off + 32].try_into().unwrap())?;
        off += 32;
        let mu = scalar::from_canonical_bytes(bytes[off..off + 32].try_into().unwrap())?;

        for value in [&a_final, &b_final, &t_hat, &tau_x, &mu] {
            if !scalar::is_valid_secret(value) {
                return Err(Error::InvalidScalar("bulletproof: zero proof scalar"));
            }
        }

        Ok(Self {
            a,
            s,
            t1,
            t2,
            ipa: ipa::IpaProof {
                l,
                r,
                a: a_final,
                b: b_final,
            },
            t_hat,
            tau_x,
            mu,
        })
    }
}

/// Prove that every value in `values` lies in `[0, 2^64)`, aggregated
/// into one proof. `blindings` must have the same length; `values.len()`
/// (== `blindings.len()`) must be a nonzero power of two. Returns the
/// proof together with the per-value commitments `V_j = v_j*G +
/// rho_j*H_base` the verifier will need (the ledger persists these
/// itself; this function doesn't).
pub fn prove(
    values: &[u64],
    blindings: &[SecretScalar],
    h_base: &ProjectivePoint,
    context_id: &[u8; 32],
) -> Result<(Proof, Vec<ProjectivePoint>)> {
    let m = values.len();
    if blindings.len() != m {
        return Err(Error::InvalidInput("bulletproof: values/blindings length mismatch"));
    }
    let rounds = rounds_for(m)?;
    let n = BP_VALUE_BITS * m;
    let gens = generators(n);

    let v_commitments: Vec<ProjectivePoint> = values
        .iter()
        .zip(blindings.iter())
        .map(|(&v, rho)| commit_value(v, &rho.expose(), h_base))
        .collect::<Result<Vec<_>>>()?;

    let one = Scalar::from(1u64);
    let mut a_l = vec![Scalar::from(0u64); n];
    let mut a_r = vec![Scalar::from(0u64); n];
    for (j, &v) in values.iter().enumerate() {
        for i in 0..BP_VALUE_BITS {
            let k = j * BP_VALUE_BITS + i;
            let bit_set = (v >> i) & 1 == 1;
            a_l[k] = if bit_set { one } else { Scalar::from(0u64) };
            a_r[k] = a_l[k] + scalar::negate(&one);
        }
    }

    let s_l: Vec<Scalar> = (0..n).map(|_| scalar::random_nonzero()).collect::<Result<_>>()?;
    let s_r: Vec<Scalar> = (0..n).map(|_| scalar::random_nonzero()).collect::<Result<_>>()?;

    let alpha = SecretScalar::random()?;
    let rho_bl = SecretScalar::random()?;

    let a_point = group::combine_terms(vec![
        group::scalar_term(h_base, alpha.expose()),
        group::msm_skip_zero(&gens.g, &a_l)?,
        group::msm_skip_zero(&gens.h, &a_r)?,
    ])?;
    let s_point = group::combine_terms(vec![
        group::scalar_term(h_base, rho_bl.expose()),
        group::msm_skip_zero(&gens.g, &s_l)?,
        group::msm_skip_zero(&gens.h, &s_r)?,
    ])?;

    let y = challenge_y(context_id, &v_commitments, &a_point, &s_point);
    if !scalar::is_valid_secret(&y) {
        return Err(Error::RandomnessFailure);
    }
    let z = challenge_z(context_id, &v_commitments, &a_point, &s_point, &y);
    if !scalar::is_valid_secret(&z) {
        return Err(Error::RandomnessFailure);
    }

    let y_pows = powers(y, n);
    let two_pows = powers(Scalar::from(2u64), BP_VALUE_BITS);

    let mut z_block_pows = Vec::with_capacity(m);
    let mut zp = z * z;
    for _ in 0..m {
        z_block_pows.push(zp);
        zp = zp * z;
    }

    let mut l0 = vec![Scalar::from(0u64); n];
    let mut r0 = vec![Scalar::from(0u64); n];
    for j in 0..m {
        let zj2 = z_block_pows[j];
        for i in 0..BP_VALUE_BITS {
            let k = j * BP_VALUE_BITS + i;
            l0[k] = a_l[k] + scalar::negate(&z);
            r0[k] = y_pows[k] * (a_r[k] + z) + zj2 * two_pows[i];
        }
    }
    let r1: Vec<Scalar> = (0..n).map(|k| s_r[k] * y_pows[k]).collect();

    let t1 = inner_product(&l0, &r1) + inner_product(&s_l, &r0);
    let t2 = inner_product(&s_l, &r1);
    if bool::from(t1.is_zero()) || bool::from(t2.is_zero()) {
        return Err(Error::RandomnessFailure);
    }

    let tau1 = SecretScalar::random()?;
    let tau2 = SecretScalar::random()?;
    let g_curve = ProjectivePoint::GENERATOR;
    let t1_point = group::combine_terms(vec![
        group::scalar_term(&g_curve, t1),
        group::scalar_term(h_base, tau1.expose()),
    ])?;
    let t2_point = group::combine_terms(vec![
        group::scalar_term(&g_curve, t2),
        group::scalar_term(h_base, tau2.expose()),
    ])?;

    let x = challenge_x(context_id, &a_point, &s_point, &y, &z, &t1_point, &t2_point);
    if !scalar::is_valid_secret(&x) {
        return Err(Error::RandomnessFailure);
    }

    let l_vec: Vec<Scalar> = (0..n).map(|k| l0[k] + s_l[k] * x).collect();
    let r_vec: Vec<Scalar> = (0..n).map(|k| r0[k] + r1[k] * x).collect();
    let t_hat = inner_product(&l_vec, &r_vec);

    let x2 = x * x;
    let mut tau_x = tau2.expose() * x2 + tau1.expose() * x;
    for j in 0..m {
        tau_x = tau_x + z_block_pows[j] * blindings[j].expose();
    }
    let mu = alpha.expose() + rho_bl.expose() * x;

    let ipa_tid = ipa_transcript_seed(context_id, &a_point, &s_point, &t1_point, &t2_point, &y, &z, &x, &t_hat);
    let ux = ipa_binding_scalar(&ipa_tid, &t_hat);
    if !scalar::is_valid_secret(&ux) {
        return Err(Error::RandomnessFailure);
    }

    let y_inv = scalar::invert(&y)?;
    let y_inv_pows = powers(y_inv, n);
    let h_prime: Vec<ProjectivePoint> = gens
        .h
        .iter()
        .zip(y_inv_pows.iter())
        .map(|(h, yi)| *h * yi)
        .collect();

    let ipa_proof = ipa::prove(&gens.g, &h_prime, &l_vec, &r_vec, &gens.u, &ux, &ipa_tid)?;
    debug_assert_eq!(ipa_proof.l.len(), rounds);

    Ok((
        Proof {
            a: a_point,
            s: s_point,
            t1: t1_point,
            t2: t2_point,
            ipa: ipa_proof,
            t_hat,
            tau_x,
            mu,
        },
        v_commitments,
    ))
}

/// Verify an aggregated Bulletproof against the `m` per-value commitments
/// it was produced for (`commitments.len()` must be a nonzero power of
/// two matching the proof's round count).
pub fn verify(
    proof: &Proof,
    commitments: &[ProjectivePoint],
    h_base: &ProjectivePoint,
    context_id: &[u8; 32],
) -> Result<()> {
    let m = commitments.len();
    let rounds = rounds_for(m)?;
    if proof.ipa.l.len() != rounds || proof.ipa.r.len() != rounds {
        return Err(Error::InvalidInput("bulletproof: round count mismatch"));
    }
    for value in [&proof.ipa.a, &proof.ipa.b, &proof.t_hat, &proof.tau_x, &proof.mu] {
        if !scalar::is_valid_secret(value) {
            return Err(Error::ProofRejected);
        }
    }

    let n = BP_VALUE_BITS * m;
    let gens = generators(n);

    let y = challenge_y(context_id, commitments, &proof.a, &proof.s);
    let z = challenge_z(context_id, commitments, &proof.a, &proof.s, &y);
    if !scalar::is_valid_secret(&y) || !scalar::is_valid_secret(&z) {
        return Err(Error::ProofRejected);
    }
    let x = challenge_x(context_id, &proof.a, &proof.s, &y, &z, &proof.t1, &proof.t2);
    if !scalar::is_valid_secret(&x) {
        return Err(Error::ProofRejected);
    }

    let y_pows = powers(y, n);
    let y_inv = scalar::invert(&y).map_err(|_| Error::ProofRejected)?;
    let y_inv_pows = powers(y_inv, n);
    let sum_y_pows = sum_scalars(&y_pows);

    let mut z_block_pows = Vec::with_capacity(m);
    let mut zp = z * z;
    for _ in 0..m {
        z_block_pows.push(zp);
        zp = zp * z;
    }
    // sum_{i=0}^{63} 2^i == 2^64 - 1 == u64::MAX.
    let sum_two_pows = Scalar::from(u64::MAX);

    let z_minus_z2 = z + scalar::negate(&(z * z));
    let mut delta = z_minus_z2 * sum_y_pows;
    for zj2 in &z_block_pows {
        delta = delta + scalar::negate(&(*zj2 * z * sum_two_pows));
    }

    let g_curve = ProjectivePoint::GENERATOR;
    let lhs = group::combine_terms(vec![
        group::scalar_term(&g_curve, proof.t_hat),
        group::scalar_term(h_base, proof.tau_x),
    ])?;

    let mut rhs_terms: Vec<Option<ProjectivePoint>> = Vec::with_capacity(m + 3);
    for (j, v) in commitments.iter().enumerate() {
        rhs_terms.push(group::scalar_term(v, z_block_pows[j]));
    }
    rhs_terms.push(group::scalar_term(&g_curve, delta));
    rhs_terms.push(group::scalar_term(&proof.t1, x));
    rhs_terms.push(group::scalar_term(&proof.t2, x * x));
    let rhs = group::combine_terms(rhs_terms)?;

    if !group::equal(&lhs, &rhs) {
        return Err(Error::ProofRejected);
    }

    let ipa_tid = ipa_transcript_seed(context_id, &proof.a, &proof.s, &proof.t1, &proof.t2, &y, &z, &x, &proof.t_hat);
    let ux = ipa_binding_scalar(&ipa_tid, &proof.t_hat);
    if !scalar::is_valid_secret(&ux) {
        return Err(Error::ProofRejected);
    }

    let h_prime: Vec<ProjectivePoint> = gens
        .h
        .iter()
        .zip(y_inv_pows.iter())
        .map(|(h, yi)| *h * yi)
        .collect();

    let mut p_terms: Vec<Option<ProjectivePoint>> = Vec::with_capacity(2 * n + 4);
    p_terms.push(Some(proof.a));
    p_terms.push(group::scalar_term(&proof.s, x));
    for k in 0..n {
        let block = k / BP_VALUE_BITS;
        let i = k % BP_VALUE_BITS;
        let two_i = Scalar::from(1u64 << i);
        p_terms.push(group::scalar_term(&gens.g[k], scalar::negate(&z)));
        let coeff = z * y_pows[k] + z_block_pows[block] * two_i;
        p_terms.push(group::scalar_term(&h_prime[k], coeff));
    }
    p_terms.push(group::scalar_term(&gens.u, proof.t_hat * ux));
    p_terms.push(group::scalar_term(h_base, scalar::negate(&proof.mu)));
    let p = group::combine_terms(p_terms)?;

    ipa::verify(&gens.g, &h_prime, &gens.u, &p, &proof.ipa, &ux, &ipa_tid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(m: usize) -> (Vec<u64>, Vec<SecretScalar>, ProjectivePoint, [u8; 32]) {
        let values: Vec<u64> = (0..m).map(|i| 1000 + i as u64 * 777).collect();
        let blindings: Vec<SecretScalar> = (0..m)
            .map(|_| SecretScalar::random().unwrap())
            .collect();
        let h_base = group::create(&scalar::random_nonzero().unwrap()).unwrap();
        let ctx = [42u8; 32];
        (values, blindings, h_base, ctx)
    }

    #[test]
    fn m1_n64_round_trips_and_has_expected_length() {
        let (values, blindings, h_base, ctx) = setup(1);
        let (proof, commitments) = prove(&[5000], &blindings[..1], &h_base, &ctx).unwrap();
        assert_eq!(proof.to_bytes().len(), 292 + 66 * 6);
        assert!(verify(&proof, &commitments, &h_base, &ctx).is_ok());
        let _ = values;
    }

    #[test]
    fn m2_aggregated_round_trips_and_has_expected_length() {
        let (_values, blindings, h_base, ctx) = setup(2);
        let (proof, commitments) = prove(&[5000, 123456], &blindings, &h_base, &ctx).unwrap();
        assert_eq!(proof.to_bytes().len(), 292 + 66 * 7);
        assert!(verify(&proof, &commitments, &h_base, &ctx).is_ok());
    }

    #[test]
    fn replacing_a_commitment_with_a_different_value_is_rejected() {
        let (_values, blindings, h_base, ctx) = setup(2);
        let (proof, mut commitments) = prove(&[5000, 123456], &blindings, &h_base, &ctx).unwrap();
        let other = commit_value(123457, &blindings[1].expose(), &h_base).unwrap();
        commitments[1] = other;
        assert!(verify(&proof, &commitments, &h_base, &ctx).is_err());
    }

    #[test]
    fn mismatched_context_id_is_rejected() {
        let (_values, blindings, h_base, ctx) = setup(1);
        let (proof, commitments) = prove(&[77], &blindings[..1], &h_base, &ctx).unwrap();
        let mut other_ctx = ctx;
        other_ctx[0] ^= 1;
        assert!(verify(&proof, &commitments, &h_base, &other_ctx).is_err());
    }

    #[test]
    fn wire_round_trip_parses_back_to_a_verifying_proof() {
        let (_values, blindings, h_base, ctx) = setup(2);
        let (proof, commitments) = prove(&[10, 20], &blindings, &h_base, &ctx).unwrap();
        let bytes = proof.to_bytes();
        let parsed = Proof::from_bytes(&bytes, 2).unwrap();
        assert!(verify(&parsed, &commitments, &h_base, &ctx).is_ok());
    }

    #[test]
    fn non_power_of_two_width_is_rejected() {
        let (_values, blindings, h_base, ctx) = setup(3);
        assert!(prove(&[1, 2, 3], &blindings, &h_base, &ctx).is_err());
    }
}
