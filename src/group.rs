//! Group primitives: the narrow contract every higher layer builds on.
//!
//! The point at infinity cannot be represented in 33-byte compressed wire
//! form, so every operation here that could produce it instead returns an
//! error; callers are expected to filter zero scalars and empty term lists
//! before calling into this layer (see `commitment.rs`'s guard pattern,
//! generalized throughout this crate).

use k256::elliptic_curve::group::{Group, GroupEncoding};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::Field;
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar};

use crate::error::{Error, Result};
use crate::scalar;

/// Parse a 33-byte SEC1-compressed point. Rejects the point at infinity
/// and malformed encodings.
pub fn parse33(bytes: &[u8]) -> Result<ProjectivePoint> {
    if bytes.len() != 33 {
        return Err(Error::InvalidLength {
            expected: 33,
            actual: bytes.len(),
        });
    }
    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidPoint)?;
    let affine: AffinePoint =
        Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or(Error::InvalidPoint)?;
    let point = ProjectivePoint::from(affine);
    if bool::from(point.is_identity()) {
        return Err(Error::InvalidPoint);
    }
    Ok(point)
}

/// Serialize a point to its 33-byte SEC1-compressed form.
pub fn serialize33(point: &ProjectivePoint) -> [u8; 33] {
    let encoded = point.to_affine().to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// Attempt to parse a candidate 33-byte buffer as a point, without
/// rejecting the identity, used internally by the NUMS try-and-increment
/// loop, which must be able to detect (and skip) an accidental identity
/// candidate itself rather than treating it as a parse failure per se.
pub(crate) fn try_parse33_allow_identity(bytes: &[u8; 33]) -> Option<ProjectivePoint> {
    let encoded = EncodedPoint::from_bytes(bytes).ok()?;
    let affine: AffinePoint = Option::from(AffinePoint::from_encoded_point(&encoded))?;
    Some(ProjectivePoint::from(affine))
}

/// Combine (sum) a slice of points. Errors if the slice is empty or the
/// result is the point at infinity (not representable on the wire).
pub fn combine(points: &[ProjectivePoint]) -> Result<ProjectivePoint> {
    let mut acc: Option<ProjectivePoint> = None;
    for p in points {
        acc = Some(match acc {
            None => *p,
            Some(a) => a + p,
        });
    }
    let acc = acc.ok_or(Error::InvalidInput("combine of zero terms"))?;
    if bool::from(acc.is_identity()) {
        return Err(Error::InvalidPoint);
    }
    Ok(acc)
}

/// Like [`combine`], but point/scalar pairs with a zero scalar are
/// filtered out first, and an all-zero input is treated as "nothing to
/// add" rather than an error, returning `None`. This mirrors
/// `msm_try_add` in the aggregated Bulletproof reference: a multi-scalar
/// multiplication whose every scalar is zero has no term to contribute to
/// an accumulator, which is a distinct situation from a caller
/// erroneously calling `combine` with no terms at all.
pub fn msm_skip_zero(points: &[ProjectivePoint], scalars: &[Scalar]) -> Result<Option<ProjectivePoint>> {
    if points.len() != scalars.len() {
        return Err(Error::InvalidInput("msm: mismatched vector lengths"));
    }
    let mut acc: Option<ProjectivePoint> = None;
    for (p, s) in points.iter().zip(scalars.iter()) {
        if bool::from(s.is_zero()) {
            continue;
        }
        let term = *p * s;
        acc = Some(match acc {
            None => term,
            Some(a) => a + term,
        });
    }
    Ok(acc)
}

/// `scalar * point`, or `None` if `scalar` is zero.
///
/// This is the zero-scalar filter every higher layer applies before
/// folding a term into a multi-scalar combination, so that a
/// structurally-zero coefficient (an unset range-proof bit, a
/// degenerate challenge) never reaches [`combine`]/[`tweak_mul`] as an
/// attempt to produce the unrepresentable point at infinity.
pub fn scalar_term(point: &ProjectivePoint, scalar: Scalar) -> Option<ProjectivePoint> {
    if bool::from(scalar.is_zero()) {
        None
    } else {
        Some(*point * scalar)
    }
}

/// Combine a set of optional terms (typically produced by
/// [`scalar_term`]/[`msm_skip_zero`]). An all-`None` input is a hard
/// error, same as [`combine`] on an empty slice.
pub fn combine_terms(terms: Vec<Option<ProjectivePoint>>) -> Result<ProjectivePoint> {
    let points: Vec<ProjectivePoint> = terms.into_iter().flatten().collect();
    combine(&points)
}

/// Multiply a point by a scalar. Errors if the scalar is zero (the result
/// would be the point at infinity, unrepresentable on the wire), callers
/// must guard zero scalars before calling.
pub fn tweak_mul(point: &ProjectivePoint, scalar: &Scalar) -> Result<ProjectivePoint> {
    if !scalar::is_valid_secret(scalar) {
        return Err(Error::InvalidScalar("tweak_mul requires a nonzero scalar"));
    }
    Ok(*point * scalar)
}

/// Negate a point.
pub fn negate(point: &ProjectivePoint) -> ProjectivePoint {
    -point
}

/// `scalar * G`. Errors if the scalar is zero.
pub fn create(scalar: &Scalar) -> Result<ProjectivePoint> {
    if !crate::scalar::is_valid_secret(scalar) {
        return Err(Error::InvalidScalar("create requires a nonzero scalar"));
    }
    Ok(ProjectivePoint::GENERATOR * scalar)
}

/// Constant-ish equality check between two points (public data, so there's
/// no secret-dependent timing to protect here).
pub fn equal(a: &ProjectivePoint, b: &ProjectivePoint) -> bool {
    a.to_affine() == b.to_affine()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_round_trips_through_wire_format() {
        let g = ProjectivePoint::GENERATOR;
        let bytes = serialize33(&g);
        let parsed = parse33(&bytes).unwrap();
        assert!(equal(&g, &parsed));
    }

    #[test]
    fn combine_of_point_and_its_negation_errors() {
        let g = ProjectivePoint::GENERATOR;
        let neg_g = negate(&g);
        assert!(combine(&[g, neg_g]).is_err());
    }

    #[test]
    fn combine_of_no_terms_errors() {
        let empty: [ProjectivePoint; 0] = [];
        assert!(combine(&empty).is_err());
    }

    #[test]
    fn msm_skip_zero_all_zero_scalars_returns_none() {
        let g = ProjectivePoint::GENERATOR;
        let zero = Scalar::ZERO;
        let res = msm_skip_zero(&[g, g], &[zero, zero]).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn tweak_mul_rejects_zero_scalar() {
        let g = ProjectivePoint::GENERATOR;
        assert!(tweak_mul(&g, &Scalar::ZERO).is_err());
    }

    #[test]
    fn scalar_term_skips_zero() {
        let g = ProjectivePoint::GENERATOR;
        assert!(scalar_term(&g, Scalar::ZERO).is_none());
        assert!(scalar_term(&g, Scalar::from(3u64)).is_some());
    }

    #[test]
    fn combine_terms_of_all_none_errors() {
        let terms: Vec<Option<ProjectivePoint>> = vec![None, None];
        assert!(combine_terms(terms).is_err());
    }
}
