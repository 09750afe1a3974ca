//! Inner Product Argument.
//!
//! Recursively halves a claim about `<a, b>` against generator vectors
//! `G`, `H` into a constant-size claim in `log2(n)` rounds, each round
//! producing a pair of commitment points `(L_j, R_j)` and a Fiat-Shamir
//! fold challenge `u_j` derived from them. The outer Bulletproof binds
//! this to its own polynomial identity through the shared point `U` and
//! binding scalar `ux`, computed by the caller before this module is
//! invoked.

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::group;
use crate::scalar;

/// The `(L, R)` commitments and final `(a, b)` scalars of a completed
/// IPA, in prover-round order.
pub struct IpaProof {
    pub l: Vec<ProjectivePoint>,
    pub r: Vec<ProjectivePoint>,
    pub a: Scalar,
    pub b: Scalar,
}

fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
    let mut acc = Scalar::from(0u64);
    for (x, y) in a.iter().zip(b.iter()) {
        acc = acc + *x * *y;
    }
    acc
}

/// `u_j = reduce32(SHA256(prev || serialize(L_j) || serialize(R_j)))`.
fn round_challenge(prev: &[u8; 32], l: &ProjectivePoint, r: &ProjectivePoint) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(prev);
    hasher.update(group::serialize33(l));
    hasher.update(group::serialize33(r));
    let digest: [u8; 32] = hasher.finalize().into();
    scalar::reduce32(&digest)
}

/// Fold `a`/`b`/`G`/`H` one round given a derived challenge and its
/// inverse (mirrored conventions for `G` and `H`).
fn fold_round(
    a_l: &[Scalar],
    a_r: &[Scalar],
    b_l: &[Scalar],
    b_r: &[Scalar],
    g_l: &[ProjectivePoint],
    g_r: &[ProjectivePoint],
    h_l: &[ProjectivePoint],
    h_r: &[ProjectivePoint],
    u: Scalar,
    u_inv: Scalar,
) -> (Vec<Scalar>, Vec<Scalar>, Vec<ProjectivePoint>, Vec<ProjectivePoint>) {
    let half = a_l.len();
    let mut next_a = Vec::with_capacity(half);
    let mut next_b = Vec::with_capacity(half);
    let mut next_g = Vec::with_capacity(half);
    let mut next_h = Vec::with_capacity(half);
    for i in 0..half {
        next_a.push(a_l[i] * u + a_r[i] * u_inv);
        next_b.push(b_l[i] * u_inv + b_r[i] * u);
        next_g.push(g_l[i] * u_inv + g_r[i] * u);
        next_h.push(h_l[i] * u + h_r[i] * u_inv);
    }
    (next_a, next_b, next_g, next_h)
}

/// Prove `<a, b>` relative to `G`, `H`, binding point `U` and binding
/// scalar `ux`, folding in `log2(n)` rounds. `seed` is the 32-byte
/// transcript seed the outer Bulletproof prover derived from everything
/// that preceded the IPA (`ipa_tid`).
pub fn prove(
    g: &[ProjectivePoint],
    h: &[ProjectivePoint],
    a: &[Scalar],
    b: &[Scalar],
    u: &ProjectivePoint,
    ux: &Scalar,
    seed: &[u8; 32],
) -> Result<IpaProof> {
    let mut g = g.to_vec();
    let mut h = h.to_vec();
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    let mut prev_challenge = *seed;

    let mut ls = Vec::new();
    let mut rs = Vec::new();

    while g.len() > 1 {
        let half = g.len() / 2;
        let (a_l, a_r) = a.split_at(half);
        let (b_l, b_r) = b.split_at(half);
        let (g_l, g_r) = g.split_at(half);
        let (h_l, h_r) = h.split_at(half);

        let c_l = inner_product(a_l, b_r);
        let c_r = inner_product(a_r, b_l);

        let l_point = group::combine_terms(vec![
            group::msm_skip_zero(g_r, a_l)?,
            group::msm_skip_zero(h_l, b_r)?,
            group::scalar_term(u, c_l * *ux),
        ])?;
        let r_point = group::combine_terms(vec![
            group::msm_skip_zero(g_l, a_r)?,
            group::msm_skip_zero(h_r, b_l)?,
            group::scalar_term(u, c_r * *ux),
        ])?;

        let challenge = round_challenge(&prev_challenge, &l_point, &r_point);
        if !scalar::is_valid_secret(&challenge) {
            return Err(Error::RandomnessFailure);
        }
        let challenge_inv = scalar::invert(&challenge)?;

        let (next_a, next_b, next_g, next_h) =
            fold_round(a_l, a_r, b_l, b_r, g_l, g_r, h_l, h_r, challenge, challenge_inv);

        ls.push(l_point);
        rs.push(r_point);
        prev_challenge = scalar::to_bytes(&challenge);

        a = next_a;
        b = next_b;
        g = next_g;
        h = next_h;
    }

    Ok(IpaProof {
        l: ls,
        r: rs,
        a: a[0],
        b: b[0],
    })
}

/// Verify an [`IpaProof`] against generators `G`, `H`, binding point `U`,
/// outer commitment `P`, and binding scalar `ux`, re-deriving every round
/// challenge from `seed` and the proof's own `(L, R)` pairs rather than
/// folding vectors explicitly.
pub fn verify(
    g: &[ProjectivePoint],
    h: &[ProjectivePoint],
    u: &ProjectivePoint,
    p: &ProjectivePoint,
    proof: &IpaProof,
    ux: &Scalar,
    seed: &[u8; 32],
) -> Result<()> {
    let n = g.len();
    let rounds = proof.l.len();
    if rounds == 0 || rounds >= usize::BITS as usize || (1usize << rounds) != n || proof.r.len() != rounds {
        return Err(Error::ProofRejected);
    }

    let mut challenges = Vec::with_capacity(rounds);
    let mut prev_challenge = *seed;
    for j in 0..rounds {
        let c = round_challenge(&prev_challenge, &proof.l[j], &proof.r[j]);
        if !scalar::is_valid_secret(&c) {
            return Err(Error::ProofRejected);
        }
        prev_challenge = scalar::to_bytes(&c);
        challenges.push(c);
    }

    let mut challenge_inv = Vec::with_capacity(rounds);
    for c in &challenges {
        challenge_inv.push(scalar::invert(c).map_err(|_| Error::ProofRejected)?);
    }

    // s_k = prod_t (u_t if bit_t(k) == 1 else u_t^-1), reading bits
    // most-significant-round-first; the H-side exponent is the mirror
    // image (equivalently, its multiplicative inverse). Direct O(n*rounds)
    // evaluation, not the O(n) incremental-product form: this verifier
    // favors being easy to read off the equations it checks over
    // multi-exponentiation speed.
    let mut g_coeffs = Vec::with_capacity(n);
    let mut h_coeffs = Vec::with_capacity(n);
    for k in 0..n {
        let mut s_g = Scalar::from(1u64);
        for (t, (&u_t, &u_inv_t)) in challenges.iter().zip(challenge_inv.iter()).enumerate() {
            let bit = (k >> (rounds - 1 - t)) & 1;
            s_g = s_g * if bit == 1 { u_t } else { u_inv_t };
        }
        let s_h = scalar::invert(&s_g).map_err(|_| Error::ProofRejected)?;
        g_coeffs.push(s_g);
        h_coeffs.push(s_h);
    }

    let g_f = group::msm_skip_zero(g, &g_coeffs)?.ok_or(Error::ProofRejected)?;
    let h_f = group::msm_skip_zero(h, &h_coeffs)?.ok_or(Error::ProofRejected)?;

    let mut p_acc = *p;
    for j in 0..rounds {
        let cj2 = challenges[j] * challenges[j];
        let cj_inv2 = challenge_inv[j] * challenge_inv[j];
        p_acc = group::combine_terms(vec![
            Some(p_acc),
            group::scalar_term(&proof.l[j], cj2),
            group::scalar_term(&proof.r[j], cj_inv2),
        ])?;
    }

    let ab_ux = proof.a * proof.b * *ux;
    let rhs = group::combine_terms(vec![
        group::scalar_term(&g_f, proof.a),
        group::scalar_term(&h_f, proof.b),
        group::scalar_term(u, ab_ux),
    ])?;

    if group::equal(&p_acc, &rhs) {
        Ok(())
    } else {
        Err(Error::ProofRejected)
    }
}
