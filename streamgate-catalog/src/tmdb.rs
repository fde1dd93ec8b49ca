//! TMDB catalog listing and title lookup.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use streamgate_core::config::MetadataConfig;
use streamgate_core::content::IdNamespace;
use streamgate_core::{ContentId, MediaKind};
use url::Url;

use crate::errors::CatalogError;
use crate::genres;
use crate::providers::{CatalogProvider, TitleLookup};
use crate::types::{CatalogExtra, MetaPreview, TitleInfo, year_from_date};

/// Base URL for poster images.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB client serving popular titles and title lookups.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Single entry of a TMDB discover or find result list.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl TmdbResult {
    fn display_name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    fn year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(year_from_date)
    }

    /// Converts the raw result into a catalog entry.
    pub fn into_preview(self, kind: MediaKind) -> MetaPreview {
        let name = self.display_name().unwrap_or_default().to_string();
        let release_info = self.year().map(|y| y.to_string());
        MetaPreview {
            id: format!("tmdb:{}", self.id),
            kind,
            name,
            poster: self
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| format!("{POSTER_BASE_URL}{p}")),
            release_info,
            description: self.overview.filter(|o| !o.is_empty()),
            genres: genres::genre_labels(&self.genre_ids),
        }
    }

    fn into_title_info(self) -> Option<TitleInfo> {
        let year = self.year();
        let title = self.display_name()?.to_string();
        Some(TitleInfo { title, year })
    }
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<TmdbResult>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbResult>,
    #[serde(default)]
    tv_results: Vec<TmdbResult>,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

fn path_segment(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "tv",
    }
}

impl TmdbClient {
    /// Creates a client from metadata configuration.
    ///
    /// # Errors
    /// - `CatalogError::ProviderError` - HTTP client could not be built
    pub fn new(config: &MetadataConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::ProviderError {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CatalogError::ProviderError {
                reason: "TMDB API key not configured".to_string(),
            })
    }

    fn endpoint(&self, path: &str, api_key: &str) -> Result<Url, CatalogError> {
        let mut url =
            Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
                CatalogError::ProviderError {
                    reason: format!("Invalid TMDB URL: {e}"),
                }
            })?;
        url.query_pairs_mut().append_pair("api_key", api_key);
        Ok(url)
    }

    /// Builds the discover URL for one catalog page.
    ///
    /// # Errors
    /// - `CatalogError::ProviderError` - Base URL is invalid
    pub fn discover_url(
        &self,
        kind: MediaKind,
        api_key: &str,
        page: u32,
        genre_code: Option<u32>,
    ) -> Result<Url, CatalogError> {
        let mut url = self.endpoint(&format!("/discover/{}", path_segment(kind)), api_key)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            query.append_pair("sort_by", "popularity.desc");
            if let Some(code) = genre_code {
                query.append_pair("with_genres", &code.to_string());
            }
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        content_id: Option<&ContentId>,
    ) -> Result<T, CatalogError> {
        tracing::debug!(path = url.path(), "TMDB request");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(content) = content_id {
                return Err(CatalogError::NotFound {
                    content_id: content.to_string(),
                });
            }
        }

        if !status.is_success() {
            let message = response
                .json::<StatusBody>()
                .await
                .ok()
                .and_then(|body| body.status_message)
                .unwrap_or_else(|| status.to_string());
            return Err(CatalogError::ProviderError {
                reason: format!("TMDB returned {}: {message}", status.as_u16()),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    async fn list(
        &self,
        kind: MediaKind,
        extra: &CatalogExtra,
    ) -> Result<Vec<MetaPreview>, CatalogError> {
        let api_key = self.api_key()?;

        let genre_code = match &extra.genre {
            Some(name) => match genres::genre_code(kind, name) {
                Some(code) => Some(code),
                None => {
                    tracing::debug!(genre = %name, "Unknown genre, returning empty catalog");
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        let url = self.discover_url(kind, api_key, extra.page(), genre_code)?;
        let response: DiscoverResponse = self.fetch(url, None).await?;

        Ok(response
            .results
            .into_iter()
            .map(|result| result.into_preview(kind))
            .collect())
    }
}

#[async_trait]
impl TitleLookup for TmdbClient {
    async fn lookup_title(
        &self,
        content: &ContentId,
        kind: MediaKind,
    ) -> Result<TitleInfo, CatalogError> {
        let api_key = self.api_key()?;

        let result = match content.namespace() {
            IdNamespace::Imdb => {
                let mut url = self.endpoint(&format!("/find/{}", content.base_id()), api_key)?;
                url.query_pairs_mut()
                    .append_pair("external_source", "imdb_id");
                let found: FindResponse = self.fetch(url, Some(content)).await?;
                let (preferred, other) = match kind {
                    MediaKind::Movie => (found.movie_results, found.tv_results),
                    MediaKind::Series => (found.tv_results, found.movie_results),
                };
                preferred.into_iter().chain(other).next()
            }
            IdNamespace::Tmdb => {
                let path = format!("/{}/{}", path_segment(kind), content.numeric_id());
                let url = self.endpoint(&path, api_key)?;
                Some(self.fetch::<TmdbResult>(url, Some(content)).await?)
            }
        };

        result
            .and_then(TmdbResult::into_title_info)
            .ok_or_else(|| CatalogError::NotFound {
                content_id: content.to_string(),
            })
    }
}
