//! Metadata provider seams and their offline implementations.

use async_trait::async_trait;
use streamgate_core::{ContentId, MediaKind};

use crate::errors::CatalogError;
use crate::types::{CatalogExtra, MetaPreview, TitleInfo};

pub mod demo;
#[cfg(test)]
pub mod mock;

pub use demo::DemoProvider;
#[cfg(test)]
pub use mock::MockProvider;

/// Source of catalog listings.
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Lists one page of popular titles of the given kind.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Provider unreachable
    /// - `CatalogError::ProviderError` - Provider refused the request
    /// - `CatalogError::ParseError` - Unexpected response shape
    async fn list(
        &self,
        kind: MediaKind,
        extra: &CatalogExtra,
    ) -> Result<Vec<MetaPreview>, CatalogError>;
}

/// Title lookup used to label streams.
#[async_trait]
pub trait TitleLookup: Send + Sync + std::fmt::Debug {
    /// Looks up the display title and year of a content id.
    ///
    /// # Errors
    /// - `CatalogError::NotFound` - Provider has no such title
    /// - `CatalogError::NetworkError` - Provider unreachable
    async fn lookup_title(
        &self,
        content: &ContentId,
        kind: MediaKind,
    ) -> Result<TitleInfo, CatalogError>;
}
