//! Loading of snarkjs verification keys with optional fingerprint pinning.

use std::path::Path;

use serde::de::DeserializeOwned;
use sha2::Digest as _;

use crate::KeyError;

/// Computes the hex-encoded SHA-256 fingerprint of a serialized key.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}

/// Builder for reading verification keys from JSON.
///
/// If a fingerprint is pinned, the raw bytes are hashed before they are parsed and a
/// mismatch aborts the load.
#[derive(Debug, Clone, Default)]
pub struct KeyLoader {
    fingerprint: Option<String>,
}

impl KeyLoader {
    /// Creates a loader without a pinned fingerprint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the expected hex-encoded SHA-256 fingerprint of the key file.
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into().to_lowercase());
        self
    }

    /// Loads a key from a file.
    pub fn load_from_path<K: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<K, KeyError> {
        let path = path.as_ref();
        tracing::debug!("loading verification key from {}", path.display());
        let bytes = std::fs::read(path)?;
        self.load_from_bytes(&bytes)
    }

    /// Loads a key from a reader.
    pub fn load_from_reader<K: DeserializeOwned>(
        &self,
        mut reader: impl std::io::Read,
    ) -> Result<K, KeyError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_from_bytes(&bytes)
    }

    /// Loads a key from in-memory JSON bytes.
    pub fn load_from_bytes<K: DeserializeOwned>(&self, bytes: &[u8]) -> Result<K, KeyError> {
        if let Some(should_fingerprint) = &self.fingerprint {
            let is_fingerprint = fingerprint(bytes);
            if &is_fingerprint != should_fingerprint {
                return Err(KeyError::FingerprintMismatch(is_fingerprint));
            }
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}
