//! Ledger adapter: the boundary this crate presents to a settlement layer
//! that has no business knowing what a Sigma protocol or an Inner Product
//! Argument is.
//!
//! Every function here takes caller-supplied public state plus a single
//! proof blob, returns [`Status`], and never leaks [`Error`] past its own
//! boundary: a settlement engine gets `Ok`, `BadProof`, or `Internal`, and
//! nothing more specific a caller could be tempted to branch on
//! incorrectly. Every call is traced at `debug` on success and `warn` on
//! rejection.

use k256::ProjectivePoint;

use crate::bulletproof;
use crate::commitment::Commitment;
use crate::elgamal::Ciphertext;
use crate::error::{Error, Result, Status};
use crate::proofs::{eq_pt, eq_pt_multi, eq_pt_same, eq_pt_shared_r, link, pok_sk};

fn to_status(result: Result<()>, op: &'static str) -> Status {
    match result {
        Ok(()) => {
            tracing::debug!(op, "proof accepted");
            Status::Ok
        }
        Err(e) => {
            let status = Status::from(e);
            match status {
                Status::BadProof => tracing::warn!(op, "proof rejected"),
                Status::Internal => tracing::error!(op, "verification failed internally"),
                Status::Ok => unreachable!("Error::into Status never yields Ok"),
            }
            status
        }
    }
}

/// Verify a registration's Schnorr proof of key ownership.
pub fn verify_registration(pk: &ProjectivePoint, proof_bytes: &[u8], context_id: Option<&[u8; 32]>) -> Status {
    let result: Result<()> = (|| {
        let proof = pok_sk::Proof::from_bytes(proof_bytes)?;
        pok_sk::verify(&proof, pk, context_id)
    })();
    to_status(result, "verify_registration")
}

/// Verify that `ct` encrypts the revealed `amount` under `pk`, used e.g.
/// when an issuer discloses a clawback amount and must prove the
/// encrypted ledger entry matches it.
pub fn verify_revealed_amount(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    amount: u64,
    proof_bytes: &[u8],
    context_id: Option<&[u8; 32]>,
) -> Status {
    let result: Result<()> = (|| {
        let proof = eq_pt::Proof::from_bytes(proof_bytes)?;
        eq_pt::verify(&proof, ct, pk, amount, context_id)
    })();
    to_status(result, "verify_revealed_amount")
}

/// Verify the linkage between an ElGamal balance ciphertext and its
/// paired Pedersen commitment, the binding a Bulletproof's range claim
/// rides on.
pub fn verify_ciphertext_commitment_link(
    ct: &Ciphertext,
    pk: &ProjectivePoint,
    pcm: &Commitment,
    proof_bytes: &[u8],
    context_id: &[u8; 32],
) -> Status {
    let result: Result<()> = (|| {
        let proof = link::Proof::from_bytes(proof_bytes)?;
        link::verify(&proof, ct, pk, pcm, context_id)
    })();
    to_status(result, "verify_ciphertext_commitment_link")
}

/// Verify a two-party plaintext-equality proof (sender/recipient transfer
/// leg consistency).
pub fn verify_transfer_equality(
    ct_sender: &Ciphertext,
    pk_sender: &ProjectivePoint,
    ct_recipient: &Ciphertext,
    pk_recipient: &ProjectivePoint,
    proof_bytes: &[u8],
    context_id: Option<&[u8; 32]>,
) -> Status {
    let result: Result<()> = (|| {
        let proof = eq_pt_same::Proof::from_bytes(proof_bytes)?;
        eq_pt_same::verify(&proof, ct_sender, pk_sender, ct_recipient, pk_recipient, context_id)
    })();
    to_status(result, "verify_transfer_equality")
}

/// Verify an N-party plaintext-equality proof (fan-out transfer with
/// independent per-recipient randomness).
pub fn verify_multi_equality(
    cts: &[Ciphertext],
    pks: &[ProjectivePoint],
    proof_bytes: &[u8],
    context_id: Option<&[u8; 32]>,
) -> Status {
    let result: Result<()> = (|| {
        let proof = eq_pt_multi::Proof::from_bytes(proof_bytes, cts.len())?;
        eq_pt_multi::verify(&proof, cts, pks, context_id)
    })();
    to_status(result, "verify_multi_equality")
}

/// Verify a shared-randomness broadcast equality proof.
pub fn verify_broadcast_equality(
    c1: &ProjectivePoint,
    c2_vec: &[ProjectivePoint],
    pks: &[ProjectivePoint],
    proof_bytes: &[u8],
    context_id: Option<&[u8; 32]>,
) -> Status {
    let result: Result<()> = (|| {
        let proof = eq_pt_shared_r::Proof::from_bytes(proof_bytes, c2_vec.len())?;
        eq_pt_shared_r::verify(&proof, c1, c2_vec, pks, context_id)
    })();
    to_status(result, "verify_broadcast_equality")
}

/// Verify an aggregated range proof over `commitments.len()` balances,
/// all blinded against the same `h_base` (the owning account's public
/// key).
pub fn verify_balance_range(
    commitments: &[ProjectivePoint],
    h_base: &ProjectivePoint,
    proof_bytes: &[u8],
    context_id: &[u8; 32],
) -> Status {
    let result: Result<()> = (|| {
        let proof = bulletproof::Proof::from_bytes(proof_bytes, commitments.len())?;
        bulletproof::verify(&proof, commitments, h_base, context_id)
    })();
    to_status(result, "verify_balance_range")
}

/// Recompute an account's canonical encrypted zero and compare it against
/// a ledger-stored ciphertext, used to check a freshly registered
/// account's initial balance entry was derived correctly rather than
/// supplied arbitrarily.
pub fn verify_canonical_encrypted_zero(
    pk: &ProjectivePoint,
    account_id: &[u8; 20],
    token_id: &[u8; 24],
    claimed: &Ciphertext,
) -> Status {
    let result: Result<()> = (|| {
        let expected = crate::elgamal::canonical_encrypted_zero(pk, account_id, token_id)?;
        if crate::group::equal(&expected.c1, &claimed.c1) && crate::group::equal(&expected.c2, &claimed.c2) {
            Ok(())
        } else {
            Err(Error::ProofRejected)
        }
    })();
    to_status(result, "verify_canonical_encrypted_zero")
}

/// Verify a Pedersen opening directly (used by test/audit tooling that
/// holds the blinding factor, not by on-chain verification paths).
pub fn verify_commitment_opening(commitment: &Commitment, value: u64, rho: &k256::Scalar) -> Status {
    let result: Result<()> = (|| {
        if crate::commitment::verify_opening(commitment, value, rho)? {
            Ok(())
        } else {
            Err(Error::ProofRejected)
        }
    })();
    to_status(result, "verify_commitment_opening")
}

/// Fold a homomorphic ciphertext update (e.g. `new_balance =
/// old_balance + delta`) and return the resulting ciphertext, a pure
/// bookkeeping helper with no proof to check, kept here because every
/// caller that verifies a transfer also needs to apply its effect to the
/// ledger's running balance.
pub fn apply_balance_delta(balance: &Ciphertext, delta: &Ciphertext) -> Ciphertext {
    crate::elgamal::add(balance, delta)
}
