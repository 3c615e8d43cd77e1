//! Hex words as they appear in Solidity calldata.

use serde::Deserialize;

/// A word as written by snarkjs (`"0x..."`) or by hand (a small JSON integer).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawWord {
    Hex(String),
    Int(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordError {
    NotHex,
    /// The value needs more than the requested number of bytes.
    Overflow,
}

/// `0x` followed by the lowercase hex of `bytes`, leading zeros kept.
pub(crate) fn encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// The hex digits after the `0x` prefix.
pub(crate) fn digits(s: &str) -> Option<&str> {
    let s = s.trim();
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Decodes `word` into exactly `width` big-endian bytes.
pub(crate) fn decode(word: &RawWord, width: usize) -> Result<Vec<u8>, WordError> {
    let bytes = match word {
        RawWord::Int(v) => v.to_be_bytes().to_vec(),
        RawWord::Hex(s) => {
            let digits = digits(s).ok_or(WordError::NotHex)?;
            if digits.is_empty() {
                return Err(WordError::NotHex);
            }
            if digits.len() % 2 == 1 {
                hex::decode(format!("0{digits}"))
            } else {
                hex::decode(digits)
            }
            .map_err(|_| WordError::NotHex)?
        }
    };
    let first_nonzero = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first_nonzero..];
    if significant.len() > width {
        return Err(WordError::Overflow);
    }
    let mut out = vec![0u8; width];
    out[width - significant.len()..].copy_from_slice(significant);
    Ok(out)
}
