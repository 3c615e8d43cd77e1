macro_rules! impl_json_canonical {
    ($curve: ident, $curve_impl: ident, $mod: ident) => {
        #[doc = concat!("JSON helpers specialised to ", stringify!($curve_impl), ".")]
        pub mod $mod {
            use crate::CanonicalJsonSerialize;
            use serde::{Serializer, de};

            impl CanonicalJsonSerialize for $curve::$curve_impl {
                fn serialize_g1<S: Serializer>(p: &Self::G1Affine, ser: S) -> Result<S::Ok, S::Error> {
                    crate::serialize_g1(p, ser)
                }

                fn serialize_g2<S: Serializer>(p: &Self::G2Affine, ser: S) -> Result<S::Ok, S::Error> {
                    crate::serialize_g2(p, ser)
                }

                fn serialize_gt<S: Serializer>(
                    p: &Self::TargetField,
                    ser: S,
                ) -> Result<S::Ok, S::Error> {
                    crate::serialize_gt(p, ser)
                }

                fn serialize_g1_seq<S: Serializer>(
                    p: &[Self::G1Affine],
                    ser: S,
                ) -> Result<S::Ok, S::Error> {
                    crate::serialize_g1_seq(p, ser)
                }

                fn deserialize_g1<'de, D>(deserializer: D) -> Result<Self::G1Affine, D::Error>
                where
                    D: de::Deserializer<'de>,
                {
                    crate::deserialize_g1(deserializer)
                }

                fn deserialize_g2<'de, D>(deserializer: D) -> Result<Self::G2Affine, D::Error>
                where
                    D: de::Deserializer<'de>,
                {
                    crate::deserialize_g2(deserializer)
                }

                fn deserialize_gt<'de, D>(deserializer: D) -> Result<Self::TargetField, D::Error>
                where
                    D: de::Deserializer<'de>,
                {
                    crate::deserialize_gt(deserializer)
                }

                fn deserialize_g1_seq<'de, D>(deserializer: D) -> Result<Vec<Self::G1Affine>, D::Error>
                where
                    D: de::Deserializer<'de>,
                {
                    crate::deserialize_g1_seq(deserializer)
                }
            }

            #[doc = concat!(
                "Serializes a ",
                stringify!($curve_impl),
                " G1 point as `[x, y, \"1\"]`, or `[\"0\", \"1\", \"0\"]` for the identity."
            )]
            pub fn serialize_g1<S: Serializer>(
                p: &$curve::G1Affine,
                ser: S,
            ) -> Result<S::Ok, S::Error> {
                crate::serialize_g1(p, ser)
            }

            #[doc = concat!(
                "Serializes a ",
                stringify!($curve_impl),
                " G2 point as `[[x0, x1], [y0, y1], [z0, z1]]`."
            )]
            pub fn serialize_g2<S: Serializer>(p: &$curve::G2Affine, ser: S) -> Result<S::Ok, S::Error> {
                crate::serialize_g2(p, ser)
            }

            #[doc = concat!("Serializes a ", stringify!($curve_impl), " Fq12 element.")]
            pub fn serialize_gt<S: Serializer>(p: &$curve::Fq12, ser: S) -> Result<S::Ok, S::Error> {
                crate::serialize_gt(p, ser)
            }

            #[doc = concat!("Serializes a sequence of ", stringify!($curve_impl), " G1 points.")]
            pub fn serialize_g1_seq<S: Serializer>(
                ps: &[$curve::G1Affine],
                ser: S,
            ) -> Result<S::Ok, S::Error> {
                crate::serialize_g1_seq(ps, ser)
            }

            #[doc = concat!(
                "Deserializes a ",
                stringify!($curve_impl),
                " G1 point. Coordinates must be canonical and the point must lie in the prime-order subgroup."
            )]
            pub fn deserialize_g1<'de, D>(deserializer: D) -> Result<$curve::G1Affine, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                crate::deserialize_g1(deserializer)
            }

            #[doc = concat!(
                "Deserializes a ",
                stringify!($curve_impl),
                " G2 point. Coordinates must be canonical and the point must lie in the prime-order subgroup."
            )]
            pub fn deserialize_g2<'de, D>(deserializer: D) -> Result<$curve::G2Affine, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                crate::deserialize_g2(deserializer)
            }

            #[doc = concat!("Deserializes a ", stringify!($curve_impl), " Fq12 element.")]
            pub fn deserialize_gt<'de, D>(deserializer: D) -> Result<$curve::Fq12, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                crate::deserialize_gt(deserializer)
            }

            #[doc = concat!("Deserializes a sequence of ", stringify!($curve_impl), " G1 points.")]
            pub fn deserialize_g1_seq<'de, D>(deserializer: D) -> Result<Vec<$curve::G1Affine>, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                crate::deserialize_g1_seq(deserializer)
            }
        }
    };
}

pub(crate) use impl_json_canonical;
