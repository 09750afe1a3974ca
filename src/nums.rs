//! Nothing-Up-My-Sleeve generator derivation.
//!
//! Deterministic try-and-increment hash-to-curve, generalizing a single-
//! purpose `generate_h` (which forces an even-Y candidate and loops a
//! fixed 256 times) into the labeled, indexed scheme the aggregated
//! Bulletproof needs for its `G_i`, `H_i`, and `U` generator vectors.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use k256::ProjectivePoint;

use crate::consts::{NUMS_CURVE_ID, NUMS_DOMAIN};
use crate::group::try_parse33_allow_identity;

type Cache = Mutex<HashMap<(Vec<u8>, u32), ProjectivePoint>>;

fn cache() -> &'static Cache {
    static CACHE: OnceLock<Cache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// `h = SHA-256(NUMS_DOMAIN || "secp256k1" || label || index_be32 || ctr_be32)`,
/// candidate `0x02 || h`, incrementing `ctr` until parse succeeds and the
/// candidate isn't the identity. Pure and idempotent; results are cached.
pub fn hash_to_point(label: &[u8], index: u32) -> ProjectivePoint {
    let key = (label.to_vec(), index);
    if let Some(p) = cache().lock().unwrap().get(&key) {
        return *p;
    }

    let mut ctr: u32 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(NUMS_DOMAIN);
        hasher.update(NUMS_CURVE_ID);
        hasher.update(label);
        hasher.update(index.to_be_bytes());
        hasher.update(ctr.to_be_bytes());
        let digest = hasher.finalize();

        let mut candidate = [0u8; 33];
        candidate[0] = 0x02;
        candidate[1..].copy_from_slice(&digest);

        if let Some(point) = try_parse33_allow_identity(&candidate) {
            if !bool::from(k256::elliptic_curve::group::Group::is_identity(&point)) {
                cache().lock().unwrap().insert(key, point);
                return point;
            }
        }

        ctr = ctr.wrapping_add(1);
    }
}

/// `[hash_to_point(label, 0), .., hash_to_point(label, n-1)]`.
pub fn generator_vector(label: &[u8], n: usize) -> Vec<ProjectivePoint> {
    (0..n as u32).map(|i| hash_to_point(label, i)).collect()
}

/// The single Pedersen blinding generator `H = hash_to_point("H", 0)`.
pub fn h_generator() -> ProjectivePoint {
    hash_to_point(b"H", 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group;

    #[test]
    fn h_generator_is_deterministic_and_not_the_base_point() {
        let h1 = h_generator();
        let h2 = h_generator();
        assert!(group::equal(&h1, &h2));
        assert!(!group::equal(&h1, &ProjectivePoint::GENERATOR));
    }

    #[test]
    fn generator_vector_entries_are_distinct() {
        let vec = generator_vector(b"G", 4);
        for i in 0..vec.len() {
            for j in (i + 1)..vec.len() {
                assert!(!group::equal(&vec[i], &vec[j]));
            }
        }
    }

    #[test]
    fn different_labels_yield_different_generators() {
        let g0 = hash_to_point(b"G", 0);
        let h0 = hash_to_point(b"H", 0);
        let u0 = hash_to_point(b"BP_U", 0);
        assert!(!group::equal(&g0, &h0));
        assert!(!group::equal(&g0, &u0));
        assert!(!group::equal(&h0, &u0));
    }
}
