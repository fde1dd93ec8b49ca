//! Candidate discovery seam.
//!
//! How candidate sources are found is deliberately left open: the gateway
//! only asks an injected `CandidateDiscovery` for them.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::content::{ContentId, MediaKind};
use crate::source::CandidateSource;
use crate::{GatewayError, Result};

/// Supplies candidate sources for a content id.
#[async_trait]
pub trait CandidateDiscovery: Send + Sync + std::fmt::Debug {
    /// Returns candidates in preference order; empty when nothing is known.
    async fn discover(&self, content: &ContentId, kind: MediaKind) -> Vec<CandidateSource>;
}

/// Discovery that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscovery;

#[async_trait]
impl CandidateDiscovery for NoDiscovery {
    async fn discover(&self, _content: &ContentId, _kind: MediaKind) -> Vec<CandidateSource> {
        Vec::new()
    }
}

/// Candidate entry in a static candidates file: a bare magnet or a full source.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandidateEntry {
    Magnet(String),
    Source(CandidateSource),
}

/// Fixed map from content id to candidates.
///
/// Lookups try the full id first (`tt0944947:1:2`), then the title id
/// (`tt0944947`).
#[derive(Debug, Default, Clone)]
pub struct StaticCandidates {
    entries: HashMap<String, Vec<CandidateSource>>,
}

impl StaticCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, content_id: &str, candidates: Vec<CandidateSource>) -> Self {
        self.entries.insert(content_id.to_string(), candidates);
        self
    }

    /// Parses a JSON object of `content id -> [magnet | source]`.
    ///
    /// Magnet links that cannot be parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Discovery` - Document is not a JSON object of arrays
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<CandidateEntry>> =
            serde_json::from_str(json).map_err(|e| GatewayError::Discovery {
                reason: format!("Invalid candidates document: {e}"),
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (content_id, list) in raw {
            let mut candidates = Vec::with_capacity(list.len());
            for entry in list {
                match entry {
                    CandidateEntry::Source(source) => candidates.push(source),
                    CandidateEntry::Magnet(uri) => match CandidateSource::from_magnet(&uri) {
                        Ok(source) => candidates.push(source),
                        Err(e) => {
                            tracing::warn!(content_id = %content_id, error = %e, "Skipping candidate");
                        }
                    },
                }
            }
            entries.insert(content_id, candidates);
        }

        Ok(Self { entries })
    }

    /// Loads a candidates file.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Io` - File could not be read
    /// - `GatewayError::Discovery` - File content is not a valid candidates document
    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        let candidates = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            titles = candidates.entries.len(),
            "Loaded static candidates"
        );
        Ok(candidates)
    }
}

#[async_trait]
impl CandidateDiscovery for StaticCandidates {
    async fn discover(&self, content: &ContentId, _kind: MediaKind) -> Vec<CandidateSource> {
        self.entries
            .get(content.as_str())
            .or_else(|| self.entries.get(content.base_id()))
            .cloned()
            .unwrap_or_default()
    }
}
