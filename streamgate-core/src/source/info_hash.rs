//! Content hash validation for peer-to-peer sources.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use super::SourceError;

static INFO_HASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{40}$").expect("info hash pattern is a valid regex")
});

/// SHA-1 hash identifying a torrent swarm.
///
/// Only constructed from strings matching the 40 hex character pattern.
/// Stored as raw bytes, rendered as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Validates and decodes a hex fingerprint.
    ///
    /// # Errors
    ///
    /// - `SourceError::MalformedHash` - Input is not exactly 40 hex characters
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        if !INFO_HASH_PATTERN.is_match(raw) {
            return Err(SourceError::MalformedHash {
                hash: raw.to_string(),
            });
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| SourceError::MalformedHash {
            hash: raw.to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Checks the fixed-length hex pattern without decoding.
    pub fn is_valid(raw: &str) -> bool {
        INFO_HASH_PATTERN.is_match(raw)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
