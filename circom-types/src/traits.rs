//! This module contains the bridge between the big-endian byte encodings used by Solidity
//! verifiers and the arkworks representation of pairing-friendly curves.

use ark_ec::{AffineRepr, pairing::Pairing};
use ark_serde_compat::CanonicalJsonSerialize;
use ark_serialize::Valid;

use crate::VerificationError;

/// Indicates whether decoded points should be checked for curve and subgroup membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckElement {
    /// Perform curve and subgroup checks
    Yes,
    /// Skip curve and subgroup checks
    No,
}

/// Checks that `p` lies on the curve and in the prime-order subgroup.
///
/// The identity passes. `name` is used in the error message.
pub fn validate_point<G: AffineRepr>(p: &G, name: &str) -> Result<(), VerificationError> {
    p.check().map_err(|_| {
        VerificationError::MalformedProof(format!(
            "{name} is not on the curve or not in the prime-order subgroup"
        ))
    })
}

/// Subgroup check for G1 elements, applied before any pairing.
pub fn validate_g1<P: Pairing>(p: &P::G1Affine, name: &str) -> Result<(), VerificationError> {
    validate_point(p, name)
}

/// Subgroup check for G2 elements, applied before any pairing.
pub fn validate_g2<P: Pairing>(p: &P::G2Affine, name: &str) -> Result<(), VerificationError> {
    validate_point(p, name)
}

#[cfg(any(feature = "bn254", feature = "bls12-381"))]
macro_rules! impl_bridge_for_curve {
    ($mod_name: ident, $config: ident, $curve: ident, $field_size: expr, $scalar_field_size: expr, $circom_name: expr) => {
        mod $mod_name {
            use ark_ec::AffineRepr;
            use ark_ff::Zero;
            use $curve::{$config, Fq, Fq2, G1Affine, G2Affine};

            use super::*;
            use crate::field;

            fn coordinate(bytes: &[u8], name: &str) -> Result<Fq, VerificationError> {
                field::from_be_bytes_strict(bytes).map_err(|_| {
                    VerificationError::MalformedProof(format!(
                        "{name} is not smaller than the base field modulus"
                    ))
                })
            }

            impl CircomArkworksPairingBridge for $config {
                const SCALAR_FIELD_BYTE_SIZE: usize = $scalar_field_size;
                const BASE_FIELD_BYTE_SIZE: usize = $field_size;
                const G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED: usize = $field_size * 2;
                const G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED: usize = $field_size * 2 * 2;

                fn get_circom_name() -> String {
                    $circom_name.to_owned()
                }

                fn g1_from_be_bytes(
                    bytes: &[u8],
                    check: CheckElement,
                ) -> Result<G1Affine, VerificationError> {
                    if bytes.len() != Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED {
                        return Err(VerificationError::MalformedProof(format!(
                            "G1 point must be {} bytes, got {}",
                            Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED,
                            bytes.len()
                        )));
                    }
                    let (x, y) = bytes.split_at(Self::BASE_FIELD_BYTE_SIZE);
                    let x = coordinate(x, "G1 x coordinate")?;
                    let y = coordinate(y, "G1 y coordinate")?;
                    if x.is_zero() && y.is_zero() {
                        return Ok(G1Affine::zero());
                    }
                    let p = G1Affine::new_unchecked(x, y);
                    if check == CheckElement::Yes {
                        validate_point(&p, "G1 point")?;
                    }
                    Ok(p)
                }

                // EVM precompile order: x.c1 || x.c0 || y.c1 || y.c0
                fn g2_from_be_bytes(
                    bytes: &[u8],
                    check: CheckElement,
                ) -> Result<G2Affine, VerificationError> {
                    if bytes.len() != Self::G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED {
                        return Err(VerificationError::MalformedProof(format!(
                            "G2 point must be {} bytes, got {}",
                            Self::G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED,
                            bytes.len()
                        )));
                    }
                    let n = Self::BASE_FIELD_BYTE_SIZE;
                    let x1 = coordinate(&bytes[..n], "G2 x.c1 coordinate")?;
                    let x0 = coordinate(&bytes[n..n * 2], "G2 x.c0 coordinate")?;
                    let y1 = coordinate(&bytes[n * 2..n * 3], "G2 y.c1 coordinate")?;
                    let y0 = coordinate(&bytes[n * 3..], "G2 y.c0 coordinate")?;

                    let x = Fq2::new(x0, x1);
                    let y = Fq2::new(y0, y1);
                    if x.is_zero() && y.is_zero() {
                        return Ok(G2Affine::zero());
                    }
                    let p = G2Affine::new_unchecked(x, y);
                    if check == CheckElement::Yes {
                        validate_point(&p, "G2 point")?;
                    }
                    Ok(p)
                }

                fn g1_to_be_bytes(p: &G1Affine) -> Vec<u8> {
                    match p.xy() {
                        Some((x, y)) => [field::to_be_bytes(&x), field::to_be_bytes(&y)].concat(),
                        None => vec![0u8; Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED],
                    }
                }

                fn g2_to_be_bytes(p: &G2Affine) -> Vec<u8> {
                    match p.xy() {
                        Some((x, y)) => [
                            field::to_be_bytes(&x.c1),
                            field::to_be_bytes(&x.c0),
                            field::to_be_bytes(&y.c1),
                            field::to_be_bytes(&y.c0),
                        ]
                        .concat(),
                        None => vec![0u8; Self::G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED],
                    }
                }
            }
        }
    };
}

/// Bridge trait between arkworks pairings and the fixed-width big-endian encodings used
/// in Solidity calldata and proof blobs.
pub trait CircomArkworksPairingBridge: Pairing + CanonicalJsonSerialize {
    /// Size of an element of the scalar field in bytes (`n8r`)
    const SCALAR_FIELD_BYTE_SIZE: usize;
    /// Size of an element of the base field in bytes (`n8q`)
    const BASE_FIELD_BYTE_SIZE: usize;
    /// Size of an uncompressed G1 element in bytes
    const G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED: usize;
    /// Size of an uncompressed G2 element in bytes
    const G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED: usize;

    /// Returns the name of the curve as written by snarkjs (`"bn128"`, `"bls12381"`)
    fn get_circom_name() -> String;

    /// Decodes `x || y`. All zeros is the identity. Coordinates must be smaller than the
    /// base field modulus.
    fn g1_from_be_bytes(
        bytes: &[u8],
        check: CheckElement,
    ) -> Result<Self::G1Affine, VerificationError>;

    /// Decodes `x.c1 || x.c0 || y.c1 || y.c0`. All zeros is the identity. Coordinates must
    /// be smaller than the base field modulus.
    fn g2_from_be_bytes(
        bytes: &[u8],
        check: CheckElement,
    ) -> Result<Self::G2Affine, VerificationError>;

    /// Encodes a G1 point as `x || y`, the identity as zeros.
    fn g1_to_be_bytes(p: &Self::G1Affine) -> Vec<u8>;

    /// Encodes a G2 point as `x.c1 || x.c0 || y.c1 || y.c0`, the identity as zeros.
    fn g2_to_be_bytes(p: &Self::G2Affine) -> Vec<u8>;

    /// Decodes `num` consecutive G1 points.
    /// The default implementation runs multithreaded using rayon if the `parallel` feature is enabled.
    fn g1_vec_from_be_bytes(
        bytes: &[u8],
        num: usize,
        check: CheckElement,
    ) -> Result<Vec<Self::G1Affine>, VerificationError> {
        if bytes.len() != Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED * num {
            return Err(VerificationError::MalformedProof(format!(
                "expected {num} G1 points ({} bytes), got {} bytes",
                Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED * num,
                bytes.len()
            )));
        }
        #[cfg(feature = "parallel")]
        use rayon::prelude::*;

        #[cfg(feature = "parallel")]
        let ret_val = bytes
            .par_chunks_exact(Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED)
            .map(|chunk| Self::g1_from_be_bytes(chunk, check))
            .collect::<Result<Vec<_>, _>>();

        #[cfg(not(feature = "parallel"))]
        let ret_val = bytes
            .chunks_exact(Self::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED)
            .map(|chunk| Self::g1_from_be_bytes(chunk, check))
            .collect::<Result<Vec<_>, _>>();
        ret_val
    }
}

#[cfg(feature = "bn254")]
impl_bridge_for_curve!(bn254, Bn254, ark_bn254, 32, 32, "bn128");

#[cfg(feature = "bls12-381")]
impl_bridge_for_curve!(bls12_381, Bls12_381, ark_bls12_381, 48, 32, "bls12381");
