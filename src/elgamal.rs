//! EC-ElGamal encryption over secp256k1.
//!
//! `(C1, C2) = (r*G, m*G + r*Q)`, additively homomorphic in both the
//! plaintext and the ciphertext. Decryption recovers `m` by masking off the
//! shared secret and then brute-forcing the discrete log of `m*G` against
//! an incrementally-built table: each round adds `G` to the running point
//! rather than recomputing `i*G` from scratch, which is the whole reason
//! the 10^6-step search is tractable.

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::consts::ELGAMAL_DECRYPT_WINDOW;
use crate::error::{Error, Result};
use crate::group;
use crate::scalar;

/// An EC-ElGamal ciphertext: `(C1, C2) = (r*G, m*G + r*Q)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ciphertext {
    pub c1: ProjectivePoint,
    pub c2: ProjectivePoint,
}

impl Ciphertext {
    pub fn to_bytes(&self) -> [u8; 66] {
        let mut out = [0u8; 66];
        out[..33].copy_from_slice(&group::serialize33(&self.c1));
        out[33..].copy_from_slice(&group::serialize33(&self.c2));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 66 {
            return Err(Error::InvalidLength {
                expected: 66,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            c1: group::parse33(&bytes[..33])?,
            c2: group::parse33(&bytes[33..])?,
        })
    }
}

// Ledger-side transport convenience only, the wire format is always the
// 66-byte `C1 || C2` encoding, same as [`Ciphertext::to_bytes`]/`from_bytes`.
#[cfg(feature = "serde")]
impl serde::Serialize for Ciphertext {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Ciphertext {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = <Vec<u8> as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// `Q = sk*G`. `sk` must already be a valid nonzero secret scalar (see
/// [`crate::scalar::random_nonzero`]).
pub fn derive_public_key(sk: &Scalar) -> Result<ProjectivePoint> {
    group::create(sk)
}

/// Generate a fresh keypair: a random nonzero secret scalar and its
/// public point `Q = sk*G`.
pub fn keygen() -> Result<(Scalar, ProjectivePoint)> {
    let sk = scalar::random_nonzero()?;
    let q = derive_public_key(&sk)?;
    Ok((sk, q))
}

fn amount_point(amount: u64) -> Result<Option<ProjectivePoint>> {
    if amount == 0 {
        return Ok(None);
    }
    let scalar = Scalar::from(amount);
    Ok(Some(group::create(&scalar)?))
}

/// Encrypt `amount` under public key `q` using explicit randomness `r`
/// (which must be nonzero, `C1 = r*G` is unrepresentable otherwise).
pub fn encrypt(q: &ProjectivePoint, amount: u64, r: &Scalar) -> Result<Ciphertext> {
    let c1 = group::create(r)?;
    let shared_secret = group::tweak_mul(q, r)?;

    let c2 = match amount_point(amount)? {
        None => shared_secret,
        Some(m_g) => m_g + shared_secret,
    };

    Ok(Ciphertext { c1, c2 })
}

/// Decrypt `ct` under secret key `sk`, searching for the plaintext amount
/// in `[0, ELGAMAL_DECRYPT_WINDOW]`. Returns `ProofRejected` if no amount
/// in that window matches, callers outside the window must rely on
/// homomorphic bookkeeping rather than ever decrypting directly.
pub fn decrypt(ct: &Ciphertext, sk: &Scalar) -> Result<u64> {
    let shared_secret = group::tweak_mul(&ct.c1, sk)?;

    if group::equal(&ct.c2, &shared_secret) {
        return Ok(0);
    }

    let target = ct.c2 + group::negate(&shared_secret);

    let g = ProjectivePoint::GENERATOR;
    let mut current = g;
    for i in 1..=ELGAMAL_DECRYPT_WINDOW {
        if group::equal(&current, &target) {
            return Ok(i);
        }
        current += g;
    }

    Err(Error::ProofRejected)
}

/// `(a.c1 + b.c1, a.c2 + b.c2)`, encrypting the sum of the two plaintexts
/// under the sum of their randomness.
pub fn add(a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
    Ciphertext {
        c1: a.c1 + b.c1,
        c2: a.c2 + b.c2,
    }
}

/// `(a.c1 - b.c1, a.c2 - b.c2)`.
pub fn sub(a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
    Ciphertext {
        c1: a.c1 - b.c1,
        c2: a.c2 - b.c2,
    }
}

/// Recompute the ciphertext from `(amount, r)` under `q` and check it
/// matches `ct` exactly, used by the plaintext-equality proofs' tests and
/// by any caller that already holds the opening.
pub fn verify_encryption(ct: &Ciphertext, q: &ProjectivePoint, amount: u64, r: &Scalar) -> Result<bool> {
    let recomputed = encrypt(q, amount, r)?;
    Ok(group::equal(&ct.c1, &recomputed.c1) && group::equal(&ct.c2, &recomputed.c2))
}

/// Deterministically derive the randomness for an account's "canonical
/// encrypted zero" from its account id (20 bytes) and token id (24 bytes),
/// then encrypt zero with it.
///
/// `r = SHA-256("EncZero" || account_id || token_id)`, rejection-sampled:
/// on an invalid candidate, the *prior digest* (not the original buffer)
/// is re-hashed (a literal re-hash of the static input would never
/// terminate).
pub fn canonical_encrypted_zero(
    q: &ProjectivePoint,
    account_id: &[u8; 20],
    token_id: &[u8; 24],
) -> Result<Ciphertext> {
    let mut buf = Vec::with_capacity(51);
    buf.extend_from_slice(crate::consts::ENC_ZERO_DOMAIN);
    buf.extend_from_slice(account_id);
    buf.extend_from_slice(token_id);

    const MAX_ATTEMPTS: usize = 256;
    let mut digest: [u8; 32] = Sha256::digest(&buf).into();

    for _ in 0..MAX_ATTEMPTS {
        if let Ok(candidate) = scalar::from_canonical_bytes(&digest) {
            if scalar::is_valid_secret(&candidate) {
                return encrypt(q, 0, &candidate);
            }
        }
        digest = Sha256::digest(digest).into();
    }

    Err(Error::RandomnessFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::random_nonzero;

    fn keypair() -> (Scalar, ProjectivePoint) {
        let sk = random_nonzero().unwrap();
        let q = derive_public_key(&sk).unwrap();
        (sk, q)
    }

    #[test]
    fn encrypt_decrypt_round_trips_nonzero_amount() {
        let (sk, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, 42, &r).unwrap();
        assert_eq!(decrypt(&ct, &sk).unwrap(), 42);
    }

    #[test]
    fn encrypt_decrypt_round_trips_zero_amount() {
        let (sk, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, 0, &r).unwrap();
        assert_eq!(decrypt(&ct, &sk).unwrap(), 0);
    }

    #[test]
    fn decrypt_rejects_amount_outside_window() {
        let (sk, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, ELGAMAL_DECRYPT_WINDOW + 1, &r).unwrap();
        assert!(decrypt(&ct, &sk).is_err());
    }

    #[test]
    fn homomorphic_addition_matches_summed_decryption() {
        let (sk, q) = keypair();
        let r1 = random_nonzero().unwrap();
        let r2 = random_nonzero().unwrap();
        let a = encrypt(&q, 100, &r1).unwrap();
        let b = encrypt(&q, 50, &r2).unwrap();
        let sum = add(&a, &b);
        assert_eq!(decrypt(&sum, &sk).unwrap(), 150);
    }

    #[test]
    fn homomorphic_subtraction_matches_diffed_decryption() {
        let (sk, q) = keypair();
        let r1 = random_nonzero().unwrap();
        let r2 = random_nonzero().unwrap();
        let a = encrypt(&q, 100, &r1).unwrap();
        let b = encrypt(&q, 50, &r2).unwrap();
        let diff = sub(&a, &b);
        assert_eq!(decrypt(&diff, &sk).unwrap(), 50);
    }

    #[test]
    fn verify_encryption_detects_mismatched_amount() {
        let (_, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, 10, &r).unwrap();
        assert!(verify_encryption(&ct, &q, 10, &r).unwrap());
        assert!(!verify_encryption(&ct, &q, 11, &r).unwrap());
    }

    #[test]
    fn canonical_encrypted_zero_is_deterministic() {
        let (sk, q) = keypair();
        let account_id = [7u8; 20];
        let token_id = [9u8; 24];
        let a = canonical_encrypted_zero(&q, &account_id, &token_id).unwrap();
        let b = canonical_encrypted_zero(&q, &account_id, &token_id).unwrap();
        assert!(group::equal(&a.c1, &b.c1));
        assert!(group::equal(&a.c2, &b.c2));
        assert_eq!(decrypt(&a, &sk).unwrap(), 0);
    }

    #[test]
    fn wire_round_trip() {
        let (_, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, 7, &r).unwrap();
        let bytes = ct.to_bytes();
        let parsed = Ciphertext::from_bytes(&bytes).unwrap();
        assert!(group::equal(&ct.c1, &parsed.c1));
        assert!(group::equal(&ct.c2, &parsed.c2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let (_, q) = keypair();
        let r = random_nonzero().unwrap();
        let ct = encrypt(&q, 7, &r).unwrap();
        let json = serde_json::to_vec(&ct).unwrap();
        let parsed: Ciphertext = serde_json::from_slice(&json).unwrap();
        assert!(group::equal(&ct.c1, &parsed.c1));
        assert!(group::equal(&ct.c2, &parsed.c2));
    }
}
