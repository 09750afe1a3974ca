//! Fixed protocol parameters.
//!
//! These are compiled-in wire-format constants, not deployment
//! configuration: changing any of them breaks compatibility with every
//! existing ciphertext, commitment, or proof.

/// Domain tag for NUMS hash-to-curve generator derivation.
pub const NUMS_DOMAIN: &[u8] = b"MPT_BULLETPROOF_V1_NUMS";
/// Curve identifier mixed into every NUMS derivation.
pub const NUMS_CURVE_ID: &[u8] = b"secp256k1";
/// Domain tag for the aggregated Bulletproof's y/z/x challenges.
pub const BULLETPROOF_RANGE_DOMAIN: &[u8] = b"MPT_BULLETPROOF_RANGE";
/// Domain tag for the Schnorr proof of knowledge of a secret key.
pub const POK_SK_DOMAIN: &[u8] = b"MPT_POK_SK_REGISTER";
/// Domain tag for the ciphertext/known-plaintext equality proof.
pub const EQ_PT_DOMAIN: &[u8] = b"MPT_POK_PLAINTEXT_PROOF";
/// Domain tag for the ElGamal/Pedersen linkage proof.
pub const LINK_DOMAIN: &[u8] = b"MPT_ELGAMAL_PEDERSEN_LINK";
/// Domain tag shared by the 1-of-N and 2-party same-plaintext proofs.
///
/// This collision is intentional and preserved from the reference
/// implementation; see DESIGN.md.
pub const SAME_PLAINTEXT_DOMAIN: &[u8] = b"MPT_POK_SAME_PLAINTEXT_PROOF";
/// Domain tag for the shared-randomness 1-of-N plaintext equality proof.
pub const SAME_PLAINTEXT_SHARED_R_DOMAIN: &[u8] = b"MPT_POK_SAME_PLAINTEXT_SHARED_R";
/// Domain tag for canonical-encrypted-zero derivation.
pub const ENC_ZERO_DOMAIN: &[u8] = b"EncZero";

/// Number of bits proved in range per aggregated value.
pub const BP_VALUE_BITS: usize = 64;

/// Upper bound on the brute-force discrete-log search performed by
/// [`crate::elgamal::decrypt`].
///
/// Callers needing larger amounts must rely on range-proved homomorphic
/// bookkeeping rather than ever calling decrypt on large plaintexts.
pub const ELGAMAL_DECRYPT_WINDOW: u64 = 1_000_000;

/// Byte length of a compressed secp256k1 point.
pub const POINT_LEN: usize = 33;
/// Byte length of a canonical scalar.
pub const SCALAR_LEN: usize = 32;
/// Byte length of an account identifier (for canonical encrypted zero).
pub const ACCOUNT_ID_LEN: usize = 20;
/// Byte length of a token identifier (for canonical encrypted zero).
pub const TOKEN_ID_LEN: usize = 24;
/// Byte length of an opaque transcript-binding context id.
pub const CONTEXT_ID_LEN: usize = 32;
