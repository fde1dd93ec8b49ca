//! Error types for catalog and metadata functionality.

use thiserror::Error;

/// Errors that can occur while talking to a metadata provider.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network communication error occurred during a provider call.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// Failed to parse provider response data.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// Provider returned an error status or is not configured.
    #[error("Provider error: {reason}")]
    ProviderError {
        /// The reason for the provider error
        reason: String,
    },

    /// Provider has no record for the requested title.
    #[error("Title not found: {content_id}")]
    NotFound {
        /// The content id that was looked up
        content_id: String,
    },

    /// Catalog id not served by this gateway.
    #[error("Unknown catalog: {catalog_id}")]
    UnknownCatalog {
        /// The catalog id from the request path
        catalog_id: String,
    },
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::ParseError {
                reason: e.to_string(),
            }
        } else {
            CatalogError::NetworkError {
                reason: e.to_string(),
            }
        }
    }
}
