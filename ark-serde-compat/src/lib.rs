//! # ark-serde-compat
//!
//! Serde helpers that read and write arkworks types in the JSON layout produced by
//! snarkjs: field elements are decimal strings, G1 points are `[x, y, z]` and G2 points
//! are `[[x0, x1], [y0, y1], [z0, z1]]`.
//!
//! In contrast to `FromStr` on arkworks fields, which reduces its input modulo `p`,
//! every decimal string read by this crate must already be a canonical representative.
//! Non-canonical values are rejected. Curve points are checked to be on the curve and
//! in the prime-order subgroup.
//!
//! ## Features
//!
//! - `bn254`: curve-specific helpers and [`CanonicalJsonSerialize`] for BN254
//! - `bls12-381`: curve-specific helpers and [`CanonicalJsonSerialize`] for BLS12-381
//!
//! ## Usage
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Signals {
//!     #[serde(serialize_with = "ark_serde_compat::serialize_f_seq")]
//!     #[serde(deserialize_with = "ark_serde_compat::deserialize_f_seq")]
//!     values: Vec<ark_bn254::Fr>,
//! }
//! ```

#![deny(missing_docs)]
use std::fmt;

use ark_ec::{
    AffineRepr, CurveGroup,
    pairing::Pairing,
    short_weierstrass::{Affine, Projective, SWCurveConfig},
};
use ark_ff::{
    BigInteger, CubicExtConfig, CubicExtField, Fp12Config, Fp12ConfigWrapper, One, PrimeField,
    QuadExtConfig, QuadExtField, Zero,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serializer, de, ser::SerializeSeq as _};

#[cfg(any(feature = "bn254", feature = "bls12-381"))]
mod impl_macro;

/// JSON (de)serialization of the elements of a pairing-friendly curve.
///
/// Implemented for the supported curves so that generic containers can name
/// `P::serialize_g1` etc. in their serde attributes.
pub trait CanonicalJsonSerialize: Pairing {
    /// Serializes a G1 point as `[x, y, z]`.
    fn serialize_g1<S: Serializer>(p: &Self::G1Affine, ser: S) -> Result<S::Ok, S::Error>;

    /// Serializes a G2 point as `[[x0, x1], [y0, y1], [z0, z1]]`.
    fn serialize_g2<S: Serializer>(p: &Self::G2Affine, ser: S) -> Result<S::Ok, S::Error>;

    /// Serializes a target group element as `[[[String; 2]; 3]; 2]`.
    fn serialize_gt<S: Serializer>(p: &Self::TargetField, ser: S) -> Result<S::Ok, S::Error>;

    /// Serializes a sequence of G1 points.
    fn serialize_g1_seq<S: Serializer>(p: &[Self::G1Affine], ser: S) -> Result<S::Ok, S::Error>;

    /// Deserializes a G1 point, checking curve equation and subgroup membership.
    fn deserialize_g1<'de, D>(deserializer: D) -> Result<Self::G1Affine, D::Error>
    where
        D: de::Deserializer<'de>;

    /// Deserializes a G2 point, checking curve equation and subgroup membership.
    fn deserialize_g2<'de, D>(deserializer: D) -> Result<Self::G2Affine, D::Error>
    where
        D: de::Deserializer<'de>;

    /// Deserializes a target group element.
    fn deserialize_gt<'de, D>(deserializer: D) -> Result<Self::TargetField, D::Error>
    where
        D: de::Deserializer<'de>;

    /// Deserializes a sequence of G1 points, checking every element.
    fn deserialize_g1_seq<'de, D>(deserializer: D) -> Result<Vec<Self::G1Affine>, D::Error>
    where
        D: de::Deserializer<'de>;
}

/// Reasons a decimal string is not a canonical field element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalError {
    /// The string is empty or contains something other than ASCII digits.
    NotANumber,
    /// The number is greater than or equal to the field modulus.
    OutOfRange,
}

impl fmt::Display for CanonicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalError::NotANumber => f.write_str("not a decimal number"),
            CanonicalError::OutOfRange => f.write_str("value is not smaller than the modulus"),
        }
    }
}

impl std::error::Error for CanonicalError {}

/// Returns the modulus of `F` as an unbounded integer.
pub fn modulus<F: PrimeField>() -> BigUint {
    BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
}

/// Converts an integer into `F` if it is smaller than the modulus.
pub fn from_biguint<F: PrimeField>(value: &BigUint) -> Result<F, CanonicalError> {
    if value >= &modulus::<F>() {
        return Err(CanonicalError::OutOfRange);
    }
    Ok(F::from_le_bytes_mod_order(&value.to_bytes_le()))
}

/// Parses a decimal string into `F` without reducing it.
pub fn parse_canonical<F: PrimeField>(s: &str) -> Result<F, CanonicalError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CanonicalError::NotANumber);
    }
    let value = BigUint::parse_bytes(s.as_bytes(), 10).ok_or(CanonicalError::NotANumber)?;
    from_biguint(&value)
}

/// Renders a field element as the decimal string of its canonical representative.
///
/// Zero is rendered as `"0"`.
pub fn to_decimal<F: PrimeField>(f: &F) -> String {
    BigUint::from_bytes_le(&f.into_bigint().to_bytes_le()).to_string()
}

/// Serializes a prime field element as a decimal string.
pub fn serialize_f<S: Serializer>(f: &impl PrimeField, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&to_decimal(f))
}

/// Serializes a sequence of prime field elements as an array of decimal strings.
pub fn serialize_f_seq<S: Serializer, F: PrimeField>(fs: &[F], ser: S) -> Result<S::Ok, S::Error> {
    let mut seq = ser.serialize_seq(Some(fs.len()))?;
    for f in fs {
        seq.serialize_element(&to_decimal(f))?;
    }
    seq.end()
}

/// Deserializes a prime field element from a canonical decimal string.
pub fn deserialize_f<'de, F, D>(deserializer: D) -> Result<F, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
{
    let s = String::deserialize(deserializer)?;
    parse_canonical(&s).map_err(|e| de::Error::custom(format!("invalid field element {s:?}: {e}")))
}

/// Deserializes a sequence of prime field elements from an array of canonical decimal strings.
pub fn deserialize_f_seq<'de, D, F>(deserializer: D) -> Result<Vec<F>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
{
    let strings = Vec::<String>::deserialize(deserializer)?;
    strings
        .iter()
        .enumerate()
        .map(|(i, s)| {
            parse_canonical(s).map_err(|e| {
                de::Error::custom(format!("invalid field element at index {i} ({s:?}): {e}"))
            })
        })
        .collect()
}

/// Serializes a G1 point as `[x, y, "1"]`, or `["0", "1", "0"]` for the identity.
pub fn serialize_g1<S: Serializer, F: PrimeField>(
    p: &impl AffineRepr<BaseField = F>,
    ser: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = ser.serialize_seq(Some(3))?;
    for coordinate in g1_to_strings(p) {
        seq.serialize_element(&coordinate)?;
    }
    seq.end()
}

/// Serializes a sequence of G1 points.
pub fn serialize_g1_seq<S: Serializer, F: PrimeField>(
    ps: &[impl AffineRepr<BaseField = F>],
    ser: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = ser.serialize_seq(Some(ps.len()))?;
    for p in ps {
        seq.serialize_element(&g1_to_strings(p))?;
    }
    seq.end()
}

/// Serializes a G2 point as `[[x0, x1], [y0, y1], ["1", "0"]]`.
///
/// The identity is written as `[["0", "0"], ["1", "0"], ["0", "0"]]`.
pub fn serialize_g2<F, S: Serializer>(
    p: &impl AffineRepr<BaseField = QuadExtField<F>>,
    ser: S,
) -> Result<S::Ok, S::Error>
where
    F: QuadExtConfig,
    F::BaseField: PrimeField,
{
    let coordinates = match p.xy() {
        Some((x, y)) => [
            [to_decimal(&x.c0), to_decimal(&x.c1)],
            [to_decimal(&y.c0), to_decimal(&y.c1)],
            ["1".to_owned(), "0".to_owned()],
        ],
        None => [
            ["0".to_owned(), "0".to_owned()],
            ["1".to_owned(), "0".to_owned()],
            ["0".to_owned(), "0".to_owned()],
        ],
    };
    let mut seq = ser.serialize_seq(Some(3))?;
    for coordinate in coordinates {
        seq.serialize_element(&coordinate)?;
    }
    seq.end()
}

/// Serializes an Fq12 element as two Fq6 components of three Fq2 pairs each.
pub fn serialize_gt<S: Serializer, T>(
    p: &QuadExtField<Fp12ConfigWrapper<T>>,
    ser: S,
) -> Result<S::Ok, S::Error>
where
    T: Fp12Config,
{
    let mut seq = ser.serialize_seq(Some(2))?;
    for fp6 in [&p.c0, &p.c1] {
        let pairs = [&fp6.c0, &fp6.c1, &fp6.c2].map(|fp2| [to_decimal(&fp2.c0), to_decimal(&fp2.c1)]);
        seq.serialize_element(&pairs)?;
    }
    seq.end()
}

fn g1_to_strings(p: &impl AffineRepr<BaseField = impl PrimeField>) -> [String; 3] {
    match p.xy() {
        Some((x, y)) => [to_decimal(&x), to_decimal(&y), "1".to_owned()],
        None => ["0".to_owned(), "1".to_owned(), "0".to_owned()],
    }
}

/// Deserializes a G1 point from `[x, y, z]`, checking curve and subgroup membership.
pub fn deserialize_g1<'de, D, F, G1>(deserializer: D) -> Result<Affine<G1>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
    G1: SWCurveConfig<BaseField = F>,
{
    let [x, y, z] = <[String; 3]>::deserialize(deserializer)?;
    g1_from_strings(&x, &y, &z).map_err(de::Error::custom)
}

/// Deserializes a sequence of G1 points, checking every element.
pub fn deserialize_g1_seq<'de, D, F, G1>(deserializer: D) -> Result<Vec<Affine<G1>>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
    G1: SWCurveConfig<BaseField = F>,
{
    let points = Vec::<[String; 3]>::deserialize(deserializer)?;
    points
        .iter()
        .enumerate()
        .map(|(i, [x, y, z])| {
            g1_from_strings(x, y, z).map_err(|e| de::Error::custom(format!("point {i}: {e}")))
        })
        .collect()
}

/// Deserializes a G2 point from `[[x0, x1], [y0, y1], [z0, z1]]`, checking curve and subgroup membership.
pub fn deserialize_g2<'de, D, F, Q, G2>(deserializer: D) -> Result<Affine<G2>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
    Q: QuadExtConfig<BaseField = F>,
    G2: SWCurveConfig<BaseField = QuadExtField<Q>>,
{
    let [x, y, z] = <[[String; 2]; 3]>::deserialize(deserializer)?;
    let fp2 = |[c0, c1]: &[String; 2]| -> Result<QuadExtField<Q>, String> {
        Ok(QuadExtField::new(coordinate(c0)?, coordinate(c1)?))
    };
    let (x, y, z) = (
        fp2(&x).map_err(de::Error::custom)?,
        fp2(&y).map_err(de::Error::custom)?,
        fp2(&z).map_err(de::Error::custom)?,
    );
    checked_point(Projective::<G2>::new_unchecked(x, y, z), "G2").map_err(de::Error::custom)
}

/// Deserializes an Fq12 element from `[[[String; 2]; 3]; 2]`.
pub fn deserialize_gt<'de, D, F, Fp2, Fp6, Fp12>(
    deserializer: D,
) -> Result<QuadExtField<Fp12>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField,
    Fp2: QuadExtConfig<BaseField = F>,
    Fp6: CubicExtConfig<BaseField = QuadExtField<Fp2>>,
    Fp12: QuadExtConfig<BaseField = CubicExtField<Fp6>>,
{
    let [c0, c1] = <[[[String; 2]; 3]; 2]>::deserialize(deserializer)?;
    let fp6 = |c: &[[String; 2]; 3]| -> Result<CubicExtField<Fp6>, String> {
        let fp2 = |[a, b]: &[String; 2]| -> Result<QuadExtField<Fp2>, String> {
            Ok(QuadExtField::new(coordinate(a)?, coordinate(b)?))
        };
        Ok(CubicExtField::new(fp2(&c[0])?, fp2(&c[1])?, fp2(&c[2])?))
    };
    Ok(QuadExtField::new(
        fp6(&c0).map_err(de::Error::custom)?,
        fp6(&c1).map_err(de::Error::custom)?,
    ))
}

fn coordinate<F: PrimeField>(s: &str) -> Result<F, String> {
    parse_canonical(s).map_err(|e| format!("invalid coordinate {s:?}: {e}"))
}

fn g1_from_strings<F, G1>(x: &str, y: &str, z: &str) -> Result<Affine<G1>, String>
where
    F: PrimeField,
    G1: SWCurveConfig<BaseField = F>,
{
    let p = Projective::<G1>::new_unchecked(coordinate(x)?, coordinate(y)?, coordinate(z)?);
    checked_point(p, "G1")
}

// z = 0 encodes the identity. Otherwise the coordinates are Jacobian, which for the
// z = 1 that snarkjs writes coincides with affine.
fn checked_point<C: SWCurveConfig>(p: Projective<C>, group: &str) -> Result<Affine<C>, String> {
    if p.z.is_zero() {
        return Ok(Affine::identity());
    }
    let p = if p.z.is_one() {
        Affine::new_unchecked(p.x, p.y)
    } else {
        p.into_affine()
    };
    if !p.is_on_curve() {
        return Err(format!("point is not on {group}"));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(format!("point is not in the prime-order subgroup of {group}"));
    }
    Ok(p)
}

#[cfg(feature = "bn254")]
impl_macro::impl_json_canonical!(ark_bn254, Bn254, bn254);

#[cfg(feature = "bls12-381")]
impl_macro::impl_json_canonical!(ark_bls12_381, Bls12_381, bls12_381);

#[cfg(test)]
#[cfg(feature = "bn254")]
mod bn254_tests {
    use std::str::FromStr;

    use ark_ec::AffineRepr;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Points {
        #[serde(serialize_with = "crate::bn254::serialize_g1")]
        #[serde(deserialize_with = "crate::bn254::deserialize_g1")]
        g1: ark_bn254::G1Affine,
        #[serde(serialize_with = "crate::bn254::serialize_g2")]
        #[serde(deserialize_with = "crate::bn254::deserialize_g2")]
        g2: ark_bn254::G2Affine,
        #[serde(serialize_with = "crate::serialize_f_seq")]
        #[serde(deserialize_with = "crate::deserialize_f_seq")]
        scalars: Vec<ark_bn254::Fr>,
    }

    #[test]
    fn generators_survive_json() {
        let points = Points {
            g1: ark_bn254::G1Affine::generator(),
            g2: ark_bn254::G2Affine::generator(),
            scalars: vec![ark_bn254::Fr::zero(), ark_bn254::Fr::from(6u64)],
        };
        let json = serde_json::to_string(&points).unwrap();
        assert!(json.contains(r#"["1","2","1"]"#));
        assert!(json.contains(r#"["0","6"]"#));
        let back: Points = serde_json::from_str(&json).unwrap();
        assert_eq!(back, points);
    }

    #[test]
    fn identity_uses_snarkjs_encoding() {
        let points = Points {
            g1: ark_bn254::G1Affine::zero(),
            g2: ark_bn254::G2Affine::zero(),
            scalars: vec![],
        };
        let json = serde_json::to_string(&points).unwrap();
        assert!(json.contains(r#""g1":["0","1","0"]"#));
        assert!(json.contains(r#""g2":[["0","0"],["1","0"],["0","0"]]"#));
        let back: Points = serde_json::from_str(&json).unwrap();
        assert!(back.g1.is_zero());
        assert!(back.g2.is_zero());
    }

    #[test]
    fn rejects_point_off_curve() {
        let json = r#"{"g1":["1","3","1"],"g2":[["0","0"],["1","0"],["0","0"]],"scalars":[]}"#;
        let err = serde_json::from_str::<Points>(json).unwrap_err();
        assert!(err.to_string().contains("not on G1"), "{err}");
    }

    #[test]
    fn parse_canonical_is_strict() {
        let modulus = ark_bn254::Fr::MODULUS.to_string();
        let max = (super::modulus::<ark_bn254::Fr>() - 1u32).to_string();
        assert_eq!(parse_canonical::<ark_bn254::Fr>(&max), Ok(-ark_bn254::Fr::one()));
        assert_eq!(parse_canonical::<ark_bn254::Fr>("0"), Ok(ark_bn254::Fr::zero()));
        assert_eq!(
            parse_canonical::<ark_bn254::Fr>(&modulus),
            Err(CanonicalError::OutOfRange)
        );
        assert_eq!(parse_canonical::<ark_bn254::Fr>(""), Err(CanonicalError::NotANumber));
        assert_eq!(parse_canonical::<ark_bn254::Fr>("-1"), Err(CanonicalError::NotANumber));
        assert_eq!(parse_canonical::<ark_bn254::Fr>("0x10"), Err(CanonicalError::NotANumber));
        assert_eq!(to_decimal(&ark_bn254::Fr::zero()), "0");
    }

    #[test]
    fn rejects_scalar_equal_to_modulus() {
        let modulus = ark_bn254::Fr::MODULUS.to_string();
        let json = format!(
            r#"{{"g1":["0","1","0"],"g2":[["0","0"],["1","0"],["0","0"]],"scalars":["{modulus}"]}}"#
        );
        assert!(serde_json::from_str::<Points>(&json).is_err());
    }

    #[test]
    fn jacobian_coordinates_are_normalised() {
        // (1, 2) scaled to Jacobian coordinates with z = 2: (x z^2, y z^3, z)
        let z = ark_bn254::Fq::from(2u64);
        let x = ark_bn254::Fq::from(1u64) * z * z;
        let y = ark_bn254::Fq::from(2u64) * z * z * z;
        let json = format!(
            r#"{{"g1":["{}","{}","2"],"g2":[["0","0"],["1","0"],["0","0"]],"scalars":["1"]}}"#,
            to_decimal(&x),
            to_decimal(&y)
        );
        let points: Points = serde_json::from_str(&json).unwrap();
        assert_eq!(points.g1, ark_bn254::G1Affine::generator());
        assert_eq!(points.scalars, vec![ark_bn254::Fr::from_str("1").unwrap()]);
    }
}
