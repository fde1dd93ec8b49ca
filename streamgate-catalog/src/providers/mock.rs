//! Mock provider implementation for testing.

use async_trait::async_trait;
use streamgate_core::{ContentId, MediaKind};

use super::{CatalogProvider, TitleLookup};
use crate::errors::CatalogError;
use crate::types::{CatalogExtra, MetaPreview, TitleInfo};

/// Mock provider that either answers with one fixed title or always fails.
#[derive(Debug, Default)]
pub struct MockProvider {
    failing: bool,
}

impl MockProvider {
    /// Creates a mock provider that answers every call.
    pub fn new() -> Self {
        Self { failing: false }
    }

    /// Creates a mock provider whose every call fails with a network error.
    pub fn failing() -> Self {
        Self { failing: true }
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.failing {
            Err(CatalogError::NetworkError {
                reason: "mock provider offline".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogProvider for MockProvider {
    async fn list(
        &self,
        kind: MediaKind,
        extra: &CatalogExtra,
    ) -> Result<Vec<MetaPreview>, CatalogError> {
        self.check()?;
        Ok(vec![MetaPreview {
            id: format!("tt{}", 1000 + extra.skip),
            kind,
            name: "Mock Title".to_string(),
            poster: None,
            release_info: Some("2024".to_string()),
            description: None,
            genres: extra.genre.clone().into_iter().collect(),
        }])
    }
}

#[async_trait]
impl TitleLookup for MockProvider {
    async fn lookup_title(
        &self,
        _content: &ContentId,
        _kind: MediaKind,
    ) -> Result<TitleInfo, CatalogError> {
        self.check()?;
        Ok(TitleInfo {
            title: "Mock Title".to_string(),
            year: Some(2024),
        })
    }
}
