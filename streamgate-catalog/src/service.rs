//! Catalog service grouping a listing provider and a title lookup.

use std::sync::Arc;

use streamgate_core::config::MetadataConfig;
use streamgate_core::{ContentId, ContentTitle, MediaKind, RuntimeMode};

use crate::errors::CatalogError;
use crate::metadata::OmdbMetadata;
use crate::providers::{CatalogProvider, DemoProvider, TitleLookup};
use crate::tmdb::TmdbClient;
use crate::types::{CatalogExtra, MetaPreview};

/// Only catalog the gateway serves, for both media kinds.
pub const POPULAR_CATALOG_ID: &str = "popular";

/// Catalog listings and stream labels for the HTTP layer.
#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogProvider>,
    titles: Arc<dyn TitleLookup>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, titles: Arc<dyn TitleLookup>) -> Self {
        Self { catalog, titles }
    }

    /// Creates the service for a runtime mode.
    ///
    /// Development serves the offline demo titles. Production lists from TMDB
    /// and labels streams through OMDb when its key is set, TMDB otherwise.
    ///
    /// # Errors
    /// - `CatalogError::ProviderError` - HTTP clients could not be built
    pub fn from_config(mode: RuntimeMode, config: &MetadataConfig) -> Result<Self, CatalogError> {
        if mode.is_development() {
            let demo = Arc::new(DemoProvider::new());
            return Ok(Self::new(demo.clone(), demo));
        }

        if config.tmdb_api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set, catalog requests will fail");
        }

        let tmdb = Arc::new(TmdbClient::new(config)?);
        let titles: Arc<dyn TitleLookup> = match &config.omdb_api_key {
            Some(key) => Arc::new(OmdbMetadata::new(config, key.clone())?),
            None => tmdb.clone(),
        };

        Ok(Self::new(tmdb, titles))
    }

    /// Creates service with mock provider for testing.
    #[cfg(test)]
    pub fn new_with_mock() -> Self {
        let mock = Arc::new(crate::providers::MockProvider::new());
        Self::new(mock.clone(), mock)
    }

    /// Lists one page of a catalog.
    ///
    /// # Errors
    /// - `CatalogError::UnknownCatalog` - Catalog id is not served here
    /// - `CatalogError::NetworkError` / `ProviderError` / `ParseError` - Provider failed
    pub async fn list_catalog(
        &self,
        kind: MediaKind,
        catalog_id: &str,
        extra: &CatalogExtra,
    ) -> Result<Vec<MetaPreview>, CatalogError> {
        if catalog_id != POPULAR_CATALOG_ID {
            return Err(CatalogError::UnknownCatalog {
                catalog_id: catalog_id.to_string(),
            });
        }

        let metas = self.catalog.list(kind, extra).await?;
        tracing::debug!(
            kind = %kind,
            skip = extra.skip,
            genre = extra.genre.as_deref().unwrap_or(""),
            count = metas.len(),
            "Listed catalog"
        );
        Ok(metas)
    }

    /// Resolves the label shown on every stream for a content id.
    ///
    /// Lookup failures fall back to the raw content id.
    pub async fn content_title(&self, content: ContentId, kind: MediaKind) -> ContentTitle {
        match self.titles.lookup_title(&content, kind).await {
            Ok(info) => ContentTitle::from_metadata(content, &info.title, info.year),
            Err(e) => {
                tracing::warn!(content_id = %content, error = %e, "Title lookup failed, using id");
                ContentTitle::fallback(content)
            }
        }
    }
}
