//! Candidate sources: unresolved references to distributable payloads.

pub mod info_hash;
pub mod magnet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use info_hash::InfoHash;
pub use magnet::MagnetParser;

/// Errors for sources that cannot be turned into a peer-to-peer stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Malformed content hash: '{hash}'")]
    MalformedHash { hash: String },

    #[error("Invalid magnet link: {reason}")]
    InvalidMagnet { reason: String },
}

/// File discovered inside a resolved candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Unresolved reference to content, identified primarily by its hash.
///
/// The hash is kept as received; it is validated only when a peer-to-peer
/// stream is about to be emitted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSource {
    /// Content hash as supplied by discovery
    pub hash: String,
    /// Human-readable label, usually the release name
    pub label: String,
    /// Raw source reference handed to the unlock service (magnet URI)
    pub reference: String,
    /// Files known for this source, empty until resolved
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl CandidateSource {
    pub fn new(
        hash: impl Into<String>,
        label: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            label: label.into(),
            reference: reference.into(),
            files: Vec::new(),
        }
    }

    /// Builds a candidate from a magnet URI.
    ///
    /// # Errors
    ///
    /// - `SourceError::InvalidMagnet` - URI is not a magnet link or lacks a btih topic
    pub fn from_magnet(uri: &str) -> Result<Self, SourceError> {
        let parsed = MagnetParser::parse(uri)?;
        let label = parsed
            .display_name
            .unwrap_or_else(|| parsed.hash.clone());
        Ok(Self::new(parsed.hash, label, uri))
    }

    /// Validated content hash, if the raw hash matches the fixed pattern.
    ///
    /// # Errors
    ///
    /// - `SourceError::MalformedHash` - Hash is not 40 hex characters
    pub fn info_hash(&self) -> Result<InfoHash, SourceError> {
        InfoHash::parse(&self.hash)
    }
}
