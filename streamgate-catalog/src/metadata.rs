//! IMDb title lookup using the OMDb API.

use async_trait::async_trait;
use serde::Deserialize;
use streamgate_core::config::MetadataConfig;
use streamgate_core::content::IdNamespace;
use streamgate_core::{ContentId, MediaKind};

use crate::errors::CatalogError;
use crate::providers::TitleLookup;
use crate::types::TitleInfo;

/// OMDb metadata provider for labelling IMDb titles.
#[derive(Debug, Clone)]
pub struct OmdbMetadata {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response from OMDb API for movie/show details.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbResponse {
    /// Title of the media item
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Release year, or a range like "2011–2019" for series
    #[serde(rename = "Year")]
    pub year: Option<String>,
    /// Media type (movie, series, episode)
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    /// API response status
    #[serde(rename = "Response")]
    pub response: Option<String>,
    /// Error message if request failed
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbMetadata {
    /// Create OMDb metadata service from configuration and an API key.
    ///
    /// # Errors
    /// - `CatalogError::ProviderError` - HTTP client could not be built
    pub fn new(config: &MetadataConfig, api_key: impl Into<String>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::ProviderError {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.omdb_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Fetch title details by IMDb id.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - HTTP request failed
    /// - `CatalogError::ParseError` - Response was not OMDb JSON
    /// - `CatalogError::NotFound` - OMDb answered `Response: "False"`
    pub async fn fetch_by_imdb_id(&self, imdb_id: &str) -> Result<OmdbResponse, CatalogError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("i", imdb_id), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::ProviderError {
                reason: format!("OMDb returned {}", response.status().as_u16()),
            });
        }

        let omdb_data: OmdbResponse = response.json().await?;

        if omdb_data.response.as_deref() == Some("False") {
            tracing::debug!(
                imdb_id,
                error = omdb_data.error.as_deref().unwrap_or("Unknown error"),
                "OMDb lookup failed"
            );
            return Err(CatalogError::NotFound {
                content_id: imdb_id.to_string(),
            });
        }

        Ok(omdb_data)
    }
}

/// Parses the first year of `"1999"`, `"2011–2019"` or `"2019-"`.
pub fn parse_omdb_year(year: &str) -> Option<u16> {
    year.split(['-', '–'])
        .next()
        .and_then(|first| first.trim().parse().ok())
}

#[async_trait]
impl TitleLookup for OmdbMetadata {
    async fn lookup_title(
        &self,
        content: &ContentId,
        _kind: MediaKind,
    ) -> Result<TitleInfo, CatalogError> {
        if content.namespace() != IdNamespace::Imdb {
            return Err(CatalogError::NotFound {
                content_id: content.to_string(),
            });
        }

        let omdb = self.fetch_by_imdb_id(content.base_id()).await?;
        let title = omdb
            .title
            .filter(|t| !t.is_empty() && t != "N/A")
            .ok_or_else(|| CatalogError::ParseError {
                reason: "OMDb response has no title".to_string(),
            })?;

        Ok(TitleInfo {
            title,
            year: omdb.year.as_deref().and_then(parse_omdb_year),
        })
    }
}
