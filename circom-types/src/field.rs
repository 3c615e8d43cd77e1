//! Strict conversions between external integer encodings and prime field elements.
//!
//! Every integer that crosses the API boundary (decimal string, big-endian word) must be
//! a canonical representative. Nothing is reduced modulo `p` on the way in.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::VerificationError;

pub use ark_serde_compat::{CanonicalError, modulus, to_decimal};

/// Number of bytes used to encode an element of `F`.
pub fn byte_size<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize).div_ceil(8)
}

/// Parses a decimal string, rejecting values `>= p`.
pub fn from_decimal_strict<F: PrimeField>(s: &str) -> Result<F, CanonicalError> {
    ark_serde_compat::parse_canonical(s)
}

/// Interprets `bytes` as a big-endian integer, rejecting values `>= p`.
///
/// The input may be of any length, leading zeros are allowed.
pub fn from_be_bytes_strict<F: PrimeField>(bytes: &[u8]) -> Result<F, CanonicalError> {
    ark_serde_compat::from_biguint(&BigUint::from_bytes_be(bytes))
}

/// Encodes `f` as a big-endian integer of exactly [`byte_size::<F>()`](byte_size) bytes.
pub fn to_be_bytes<F: PrimeField>(f: &F) -> Vec<u8> {
    let bytes = f.into_bigint().to_bytes_be();
    let size = byte_size::<F>();
    if bytes.len() >= size {
        bytes[bytes.len() - size..].to_vec()
    } else {
        let mut padded = vec![0u8; size - bytes.len()];
        padded.extend_from_slice(&bytes);
        padded
    }
}

/// Decodes a sequence of big-endian words into public inputs.
///
/// Fails with [`VerificationError::InvalidFieldElement`] naming the first word that is
/// not a canonical element.
pub fn public_inputs_from_be_words<F: PrimeField, W: AsRef<[u8]>>(
    words: &[W],
) -> Result<Vec<F>, VerificationError> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            from_be_bytes_strict(word.as_ref())
                .map_err(|_| VerificationError::InvalidFieldElement { index })
        })
        .collect()
}

/// Decodes a sequence of decimal strings into public inputs.
///
/// Fails with [`VerificationError::InvalidFieldElement`] naming the first string that is
/// not a canonical element.
pub fn public_inputs_from_decimal<F: PrimeField, S: AsRef<str>>(
    values: &[S],
) -> Result<Vec<F>, VerificationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            from_decimal_strict(value.as_ref())
                .map_err(|_| VerificationError::InvalidFieldElement { index })
        })
        .collect()
}

#[cfg(test)]
#[cfg(feature = "bn254")]
mod bn254_tests {
    use ark_ff::{One, Zero};

    use super::*;

    #[test]
    fn be_bytes_are_fixed_width() {
        assert_eq!(byte_size::<ark_bn254::Fr>(), 32);
        assert_eq!(byte_size::<ark_bn254::Fq>(), 32);
        let bytes = to_be_bytes(&ark_bn254::Fr::from(258u64));
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[30..], &[1, 2]);
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(
            from_be_bytes_strict::<ark_bn254::Fr>(&bytes),
            Ok(ark_bn254::Fr::from(258u64))
        );
    }

    #[test]
    fn modulus_word_is_rejected() {
        let p = modulus::<ark_bn254::Fr>().to_bytes_be();
        assert_eq!(
            from_be_bytes_strict::<ark_bn254::Fr>(&p),
            Err(CanonicalError::OutOfRange)
        );
        let p_minus_one = (modulus::<ark_bn254::Fr>() - 1u32).to_bytes_be();
        assert_eq!(
            from_be_bytes_strict::<ark_bn254::Fr>(&p_minus_one),
            Ok(-ark_bn254::Fr::one())
        );
        assert_eq!(
            from_be_bytes_strict::<ark_bn254::Fr>(&[]),
            Ok(ark_bn254::Fr::zero())
        );
    }

    #[test]
    fn reports_index_of_bad_input() {
        let good = to_be_bytes(&ark_bn254::Fr::from(7u64));
        let bad = vec![0xffu8; 32];
        let err = public_inputs_from_be_words::<ark_bn254::Fr, _>(&[good.clone(), good, bad])
            .unwrap_err();
        assert_eq!(err, VerificationError::InvalidFieldElement { index: 2 });

        let err = public_inputs_from_decimal::<ark_bn254::Fr, _>(&["1", "abc"]).unwrap_err();
        assert_eq!(err, VerificationError::InvalidFieldElement { index: 1 });
    }
}
